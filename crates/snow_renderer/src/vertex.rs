//! Vertex buffer layouts for the snow pass.

use snow_procgen::Particle;

/// Vertices per flake: a 4-corner triangle strip expanded in the vertex shader.
pub const FLAKE_VERTICES: u32 = 4;

/// Particle buffer layout. One instance per flake, the quad corners come
/// from `vertex_index`.
pub fn particle_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Particle>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            // Position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // Velocity
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    }
}
