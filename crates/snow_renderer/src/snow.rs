//! The snow overlay: option handling, per-frame update and draw.

use crate::{
    backend::{SnowBackend, SnowDraw, SnowUniform, UniformInputs},
    error::Result,
    host::{MapEvent, MapHost},
};
use glam::DVec2;
use snow_core::{snow_cube_size, SnowOptions, SnowOptionsPatch, SnowWorld, MAX_PARTICLES};
use snow_procgen::ParticleField;
use std::time::Instant;

/// Construction flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowInit {
    /// Become active immediately instead of waiting for [`MapEvent::Idle`].
    pub skip_waiting_for_ready: bool,
}

/// Lifecycle of a [`Snow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnowState {
    /// Options are captured but not applied; frames only clear.
    WaitingForMapReady,
    /// Options apply immediately and frames draw.
    Active,
    /// GPU resources released; everything is a no-op.
    Stopped,
}

/// What a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Particles drawn, zero when the draw was skipped.
    pub particle_count: u32,
    /// Flake size in physical pixels after the min-zoom fade.
    pub flake_size: f64,
    pub cube_size: f64,
}

/// Falling snow drawn over a map.
///
/// The host drives it: [`Snow::frame`] once per display refresh,
/// [`Snow::handle_map_event`] for map notifications, [`Snow::set_options`]
/// whenever the configuration changes. [`Snow::stop`] (or dropping) releases
/// the particle buffer.
pub struct Snow<B: SnowBackend> {
    backend: B,
    state: SnowState,
    options: SnowOptions,
    /// Last patch received while waiting for the map.
    pending: SnowOptionsPatch,
    world: SnowWorld,
    /// Dispersion the uploaded field was generated with.
    field_dispersion: Option<f64>,
    /// Last known viewport in logical pixels.
    viewport: DVec2,
    pixel_ratio: f64,
}

impl<B: SnowBackend> Snow<B> {
    /// Attach snow to `host`, drawing through `backend`.
    pub fn new(host: &impl MapHost, backend: B, init: SnowInit, now: Instant) -> Self {
        let viewport = host.size();
        let pixel_ratio = host.pixel_ratio();

        let mut snow = Self {
            backend,
            state: SnowState::WaitingForMapReady,
            options: SnowOptions::default(),
            pending: SnowOptionsPatch::default(),
            world: SnowWorld::new(host.world_center(), viewport, now),
            field_dispersion: None,
            viewport,
            pixel_ratio,
        };
        snow.resize_backend();

        if init.skip_waiting_for_ready {
            snow.activate(now);
        }
        snow
    }

    /// Apply a partial option update.
    ///
    /// Before the map is ready only the latest patch is kept. Once active the
    /// wind drift so far is folded into the world first, so flakes already on
    /// screen don't jump when the velocity changes.
    pub fn set_options(&mut self, patch: SnowOptionsPatch, now: Instant) {
        match self.state {
            SnowState::Stopped => {
                log::debug!("Ignoring snow options after stop");
                return;
            }
            SnowState::WaitingForMapReady => {
                self.pending = patch;
                return;
            }
            SnowState::Active => {}
        }

        self.world.fold_drift(self.options.wind(), now);
        self.options = self.options.apply(&patch);
        log::debug!("Snow options: {:?}", self.options);

        if self.field_dispersion != Some(self.options.dispersion) {
            self.regenerate_field();
        }
    }

    /// React to a host notification.
    pub fn handle_map_event(&mut self, event: MapEvent, now: Instant) {
        match event {
            MapEvent::Idle => {
                if self.state == SnowState::WaitingForMapReady {
                    self.activate(now);
                }
            }
            MapEvent::Resize { size, pixel_ratio } => {
                if self.state == SnowState::Stopped {
                    return;
                }
                self.viewport = size;
                self.pixel_ratio = pixel_ratio;
                self.resize_backend();
            }
        }
    }

    /// Update the world from the host camera and draw one frame.
    pub fn frame(&mut self, host: &impl MapHost, now: Instant) -> Result<FrameStats> {
        if self.state == SnowState::Stopped {
            return Ok(FrameStats::default());
        }

        let camera = host.map_state();
        self.viewport = camera.size;
        self.pixel_ratio = host.pixel_ratio();

        let view = self.world.advance(&camera);
        let flake_size = self.options.flake_size(camera.zoom) * self.pixel_ratio;

        let draw = (self.options.is_visible_at(camera.zoom) && self.backend.has_particles()).then(|| {
            let clock = self.world.clock();
            SnowDraw {
                uniform: SnowUniform::new(UniformInputs {
                    view: &view,
                    color: self.options.color,
                    wind: self.options.wind(),
                    local_center: self.world.local_center(),
                    since_change: clock.since_change(now),
                    since_start: clock.since_start(now),
                    flake_size,
                    framebuffer: camera.size * self.pixel_ratio,
                }),
                particle_count: self.options.draw_count(),
            }
        });

        self.backend.render(draw.as_ref())?;

        Ok(FrameStats {
            particle_count: draw.map_or(0, |d| d.particle_count),
            flake_size,
            cube_size: view.cube_size,
        })
    }

    /// Clear the surface, release GPU resources and ignore everything from now on.
    pub fn stop(&mut self) {
        if self.state == SnowState::Stopped {
            return;
        }
        self.state = SnowState::Stopped;
        // Nothing draws after this, so the last flakes would stay on screen.
        if let Err(e) = self.backend.render(None) {
            log::warn!("Failed to clear snow on stop: {}", e);
        }
        self.backend.release_particles();
        self.field_dispersion = None;
        log::info!("Snow stopped");
    }

    pub fn state(&self) -> SnowState {
        self.state
    }

    pub fn options(&self) -> &SnowOptions {
        &self.options
    }

    pub fn world(&self) -> &SnowWorld {
        &self.world
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn activate(&mut self, now: Instant) {
        self.state = SnowState::Active;
        log::info!("Snow active");
        let pending = std::mem::take(&mut self.pending);
        self.set_options(pending, now);
    }

    fn regenerate_field(&mut self) {
        let field = ParticleField::generate(
            MAX_PARTICLES as usize,
            snow_cube_size(self.viewport),
            self.options.dispersion,
        );
        self.backend.upload_particles(&field);
        self.field_dispersion = Some(self.options.dispersion);
    }

    fn resize_backend(&mut self) {
        let physical = (self.viewport * self.pixel_ratio).round();
        self.backend.resize(physical.x as u32, physical.y as u32);
    }
}

impl<B: SnowBackend> Drop for Snow<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
