//! Seam between the snow loop and whatever draws it.

use crate::error::Result;
use bytemuck::{Pod, Zeroable};
use glam::{DVec2, DVec3};
use snow_core::{modulo, SnowColor, SnowView};
use snow_procgen::ParticleField;

/// Snow shader uniform (must match snow.wgsl SnowUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SnowUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye, w = cube size
    pub eye: [f32; 4],
    /// Normalized RGBA.
    pub color: [f32; 4],
    /// xyz = wind velocity, w = seconds since the last option change
    pub wind: [f32; 4],
    /// xyz = drift accumulator, w = seconds since creation
    pub local_center: [f32; 4],
    /// xy = framebuffer size in pixels, z = flake size in pixels, w unused
    pub viewport: [f32; 4],
}

/// Per-frame inputs for [`SnowUniform::new`].
#[derive(Debug, Clone, Copy)]
pub struct UniformInputs<'a> {
    pub view: &'a SnowView,
    pub color: SnowColor,
    pub wind: DVec3,
    pub local_center: DVec3,
    pub since_change: f64,
    pub since_start: f64,
    /// Flake size already scaled to physical pixels.
    pub flake_size: f64,
    /// Framebuffer size in physical pixels.
    pub framebuffer: DVec2,
}

impl SnowUniform {
    pub fn new(inputs: UniformInputs<'_>) -> Self {
        let view = inputs.view;
        let cube = view.cube_size;
        // The shader wraps positions modulo the cube, so whole cubes of drift
        // can be dropped to keep the f32 value small.
        let local = DVec3::new(
            modulo(inputs.local_center.x, cube),
            modulo(inputs.local_center.y, cube),
            modulo(inputs.local_center.z, cube),
        );

        Self {
            view_proj: view.view_proj.as_mat4().to_cols_array_2d(),
            eye: [view.eye.x as f32, view.eye.y as f32, view.eye.z as f32, cube as f32],
            color: inputs.color.normalized(),
            wind: [
                inputs.wind.x as f32,
                inputs.wind.y as f32,
                inputs.wind.z as f32,
                inputs.since_change as f32,
            ],
            local_center: [local.x as f32, local.y as f32, local.z as f32, inputs.since_start as f32],
            viewport: [
                inputs.framebuffer.x as f32,
                inputs.framebuffer.y as f32,
                inputs.flake_size as f32,
                0.0,
            ],
        }
    }

    pub fn cube_size(&self) -> f32 {
        self.eye[3]
    }

    pub fn flake_size(&self) -> f32 {
        self.viewport[2]
    }

    pub fn since_change(&self) -> f32 {
        self.wind[3]
    }

    pub fn since_start(&self) -> f32 {
        self.local_center[3]
    }
}

/// One draw of the particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowDraw {
    pub uniform: SnowUniform,
    /// Particles to draw, never more than were uploaded.
    pub particle_count: u32,
}

/// GPU operations the snow loop relies on.
///
/// Implementations own the particle buffer. Uploading replaces any previous
/// buffer wholesale.
pub trait SnowBackend {
    /// Resize the render target to `width` x `height` physical pixels.
    fn resize(&mut self, width: u32, height: u32);
    /// Replace the particle buffer with `field`.
    fn upload_particles(&mut self, field: &ParticleField);
    /// Drop the particle buffer, if any.
    fn release_particles(&mut self);
    /// Whether a particle buffer is bound.
    fn has_particles(&self) -> bool;
    /// Clear the target, then draw the particles once if `draw` is given.
    fn render(&mut self, draw: Option<&SnowDraw>) -> Result<()>;
}
