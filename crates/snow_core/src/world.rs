//! Snow world state: where the snow cube sits relative to the camera and how far the wind has carried it.
//!
//! The snow is always rendered as if the camera were between [`SNOW_FAKE_ZOOM`]
//! and `SNOW_FAKE_ZOOM + 1`. Camera motion is rescaled into that reference
//! frame and accumulated into a center that wraps modulo the cube size, so the
//! cube follows the camera without ever jumping or rescaling as zoom crosses
//! integer levels.

use crate::camera::MapState;
use crate::clock::SnowClock;
use crate::geo::{modulo, zoom_to_height};
use glam::{DMat4, DVec2, DVec3};
use std::time::Instant;

/// Reference zoom the snow cube is sized and animated at.
pub const SNOW_FAKE_ZOOM: f64 = 19.0;
/// Near clipping plane for the snow projection.
pub const SNOW_NEAR: f64 = 10.0;
/// Far clipping plane for the snow projection.
pub const SNOW_FAR: f64 = 100.0 * 500.0;

/// Map `zoom` into `[SNOW_FAKE_ZOOM, SNOW_FAKE_ZOOM + 1)` and return it with
/// the factor that converts camera motion at `zoom` into that frame.
pub fn bound_zoom(zoom: f64) -> (f64, f64) {
    let bound = SNOW_FAKE_ZOOM + modulo(zoom - SNOW_FAKE_ZOOM, 1.0);
    (bound, 2f64.powf(zoom - bound))
}

/// Edge of the snow cube for a viewport of `size` pixels.
pub fn snow_cube_size(size: DVec2) -> f64 {
    zoom_to_height(SNOW_FAKE_ZOOM, size)
}

/// Wrap every axis into `[0, size)`.
fn wrap(v: DVec3, size: f64) -> DVec3 {
    let axis = |x: f64| {
        let r = modulo(x, size);
        // Rounding can land exactly on `size` for tiny negative inputs.
        if r >= size {
            0.0
        } else {
            r
        }
    };
    DVec3::new(axis(v.x), axis(v.y), axis(v.z))
}

/// Per-frame camera data for the snow pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowView {
    pub eye: DVec3,
    pub view_proj: DMat4,
    pub cube_size: f64,
    pub bound_zoom: f64,
}

/// Snow cube anchor and wind drift accumulator.
#[derive(Debug, Clone)]
pub struct SnowWorld {
    /// Cube anchor in the fake-zoom frame, wrapped into `[0, cube_size)`.
    snow_center: DVec3,
    /// Camera center seen on the previous frame.
    prev_camera_center: DVec3,
    /// Wind displacement accumulated up to the last option change. Never wrapped.
    local_center: DVec3,
    clock: SnowClock,
}

impl SnowWorld {
    /// Start tracking a camera centered at `camera_center` on a `size` viewport.
    pub fn new(camera_center: DVec3, size: DVec2, now: Instant) -> Self {
        Self {
            snow_center: wrap(camera_center, snow_cube_size(size)),
            prev_camera_center: camera_center,
            local_center: DVec3::ZERO,
            clock: SnowClock::new(now),
        }
    }

    /// Follow the camera for one frame and derive the snow's eye and projection.
    pub fn advance(&mut self, camera: &MapState) -> SnowView {
        let (bound, scale) = bound_zoom(camera.zoom);
        let cube_size = snow_cube_size(camera.size);

        let delta = (camera.center - self.prev_camera_center) * scale;
        self.prev_camera_center = camera.center;
        if delta.is_finite() {
            self.snow_center = wrap(self.snow_center + delta, cube_size);
        } else {
            log::warn!("Ignoring non-finite camera motion {:?}", delta);
            self.snow_center = wrap(self.snow_center, cube_size);
        }

        let snow_camera = MapState {
            center: self.snow_center,
            zoom: bound,
            ..*camera
        };

        SnowView {
            eye: snow_camera.eye_position(),
            view_proj: snow_camera.view_projection(SNOW_NEAR, SNOW_FAR),
            cube_size,
            bound_zoom: bound,
        }
    }

    /// Fold the drift produced by `wind` since the last change into the
    /// accumulator and restart the change timer. Returns the folded seconds.
    pub fn fold_drift(&mut self, wind: DVec3, now: Instant) -> f64 {
        let elapsed = self.clock.mark_change(now);
        self.local_center += wind * elapsed;
        elapsed
    }

    /// Total wind displacement at `now` if `wind` has been blowing since the last change.
    pub fn drift_at(&self, wind: DVec3, now: Instant) -> DVec3 {
        self.local_center + wind * self.clock.since_change(now)
    }

    pub fn snow_center(&self) -> DVec3 {
        self.snow_center
    }

    pub fn local_center(&self) -> DVec3 {
        self.local_center
    }

    pub fn clock(&self) -> &SnowClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn camera(center: DVec3, zoom: f64, size: DVec2) -> MapState {
        MapState {
            center,
            zoom,
            rotation: 0.3,
            pitch: 0.7,
            size,
        }
    }

    #[test]
    fn bound_zoom_is_a_sawtooth() {
        let (b, s) = bound_zoom(19.3);
        assert!((b - 19.3).abs() < 1e-9);
        assert!((s - 1.0).abs() < 1e-9);

        let (b, s) = bound_zoom(20.3);
        assert!((b - 19.3).abs() < 1e-9);
        assert!((s - 2.0).abs() < 1e-9);

        let (b, s) = bound_zoom(15.75);
        assert!((b - 19.75).abs() < 1e-9);
        assert!((s - 1.0 / 16.0).abs() < 1e-12);

        let (b, _) = bound_zoom(19.0);
        assert_eq!(b, 19.0);
    }

    #[test]
    fn world_scales_motion_into_fake_zoom_frame() {
        let size = DVec2::new(1280.0, 1024.0);
        let t0 = Instant::now();
        let mut world = SnowWorld::new(DVec3::ZERO, size, t0);
        world.advance(&camera(DVec3::ZERO, 20.3, size));
        let before = world.snow_center();

        world.advance(&camera(DVec3::new(100.0, 0.0, 0.0), 20.3, size));
        let moved = world.snow_center() - before;
        assert!((moved.x - 200.0).abs() < 1e-6);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn world_snow_center_stays_wrapped() {
        let t0 = Instant::now();
        let mut size = DVec2::new(1920.0, 1080.0);
        let mut world = SnowWorld::new(DVec3::new(-5.0e8, 3.2e8, 0.0), size, t0);
        assert!(world.snow_center().cmpge(DVec3::ZERO).all());

        let mut center = DVec3::new(-5.0e8, 3.2e8, 0.0);
        for i in 0..500 {
            let step = i as f64;
            center += DVec3::new((step * 1.7).sin() * 9.0e4, (step * 0.3).cos() * -7.5e4, 0.0);
            let zoom = 3.0 + (i % 170) as f64 * 0.1;
            if i % 97 == 0 {
                size = DVec2::new(size.x, 600.0 + (i % 5) as f64 * 300.0);
            }
            let view = world.advance(&camera(center, zoom, size));
            let c = world.snow_center();
            for axis in [c.x, c.y, c.z] {
                assert!(axis >= 0.0 && axis < view.cube_size, "frame {i}: {c:?} vs {}", view.cube_size);
            }
        }
    }

    #[test]
    fn world_ignores_non_finite_motion() {
        let size = DVec2::new(800.0, 600.0);
        let mut world = SnowWorld::new(DVec3::new(10.0, 20.0, 0.0), size, Instant::now());
        let before = world.snow_center();
        world.advance(&camera(DVec3::new(f64::NAN, 0.0, 0.0), 12.0, size));
        assert_eq!(world.snow_center(), before);
    }

    #[test]
    fn world_view_uses_bound_zoom_around_snow_center() {
        let size = DVec2::new(1280.0, 1024.0);
        let mut world = SnowWorld::new(DVec3::ZERO, size, Instant::now());
        let cam = camera(DVec3::new(1.0e6, -2.0e6, 0.0), 16.4, size);
        let view = world.advance(&cam);
        let expected = MapState {
            center: world.snow_center(),
            zoom: view.bound_zoom,
            ..cam
        };
        assert_eq!(view.eye, expected.eye_position());
        assert!((view.bound_zoom - 19.4).abs() < 1e-9);
        assert_eq!(view.cube_size, snow_cube_size(size));
    }

    #[test]
    fn world_drift_is_continuous_across_velocity_change() {
        let t0 = Instant::now();
        let mut world = SnowWorld::new(DVec3::ZERO, DVec2::new(1000.0, 1000.0), t0);
        let old_wind = DVec3::new(3.0, -1.0, -500.0);
        let new_wind = DVec3::new(0.0, 40.0, -20.0);

        let t1 = t0 + Duration::from_millis(2500);
        let before = world.drift_at(old_wind, t1);
        let folded = world.fold_drift(old_wind, t1);
        let after = world.drift_at(new_wind, t1);

        assert!((folded - 2.5).abs() < 1e-9);
        assert!((before - after).length() < 1e-9);
        assert!((world.local_center() - DVec3::new(7.5, -2.5, -1250.0)).length() < 1e-9);

        let t2 = t1 + Duration::from_secs(1);
        let later = world.drift_at(new_wind, t2);
        assert!((later - (after + new_wind)).length() < 1e-9);
    }
}
