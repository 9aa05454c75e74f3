//! wgpu implementation of [`SnowBackend`].

use crate::{
    backend::{SnowBackend, SnowDraw, SnowUniform},
    error::{Result, SnowError},
    pipeline::{create_snow_bind_group_layout, create_snow_pipeline},
    vertex::FLAKE_VERTICES,
};
use bytemuck::Zeroable;
use snow_procgen::ParticleField;
use wgpu::util::DeviceExt;

/// Transparent, so the map underneath shows through.
const OVERLAY_CLEAR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 0.0,
};

/// Frame acquisition errors that only cost the current frame.
fn skips_frame(error: &wgpu::SurfaceError) -> bool {
    matches!(
        error,
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Timeout
    )
}

/// Draws snow into its own surface with wgpu.
pub struct WgpuSnowBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    /// Packed particles, replaced wholesale on every upload.
    particle_buffer: Option<wgpu::Buffer>,
    particle_capacity: u32,

    clear_color: wgpu::Color,
}

impl WgpuSnowBackend {
    /// Open a device and configure a `width` x `height` (physical pixels) surface on `target`.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SnowError::NoAdapter)?;

        log::info!("Snow using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Snow Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colors arrive as sRGB bytes and are written unchanged.
        let format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(SnowError::NoSurfaceFormat)?;

        // Flakes are blended with straight alpha, so prefer a compositor that expects it.
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PostMultiplied,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ]
        .into_iter()
        .find(|m| surface_caps.alpha_modes.contains(m))
        .or_else(|| surface_caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Snow Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SnowUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = create_snow_bind_group_layout(&device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Snow Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline = create_snow_pipeline(&device, format, &bind_group_layout);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            particle_buffer: None,
            particle_capacity: 0,
            clear_color: OVERLAY_CLEAR,
        })
    }

    /// Clear to `color` instead of transparent (for standalone windows).
    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }
}

impl SnowBackend for WgpuSnowBackend {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn upload_particles(&mut self, field: &ParticleField) {
        self.release_particles();
        if field.is_empty() {
            return;
        }

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Snow Particle Buffer"),
            contents: field.as_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.particle_buffer = Some(buffer);
        self.particle_capacity = field.len() as u32;
    }

    fn release_particles(&mut self) {
        if let Some(buffer) = self.particle_buffer.take() {
            buffer.destroy();
        }
        self.particle_capacity = 0;
    }

    fn has_particles(&self) -> bool {
        self.particle_buffer.is_some()
    }

    fn render(&mut self, draw: Option<&SnowDraw>) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(e) if skips_frame(&e) => {
                log::warn!("Snow frame skipped: {:?}", e);
                if !matches!(e, wgpu::SurfaceError::Timeout) {
                    self.surface.configure(&self.device, &self.config);
                }
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(draw) = draw {
            self.queue
                .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[draw.uniform]));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Snow Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Snow Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (Some(draw), Some(buffer)) = (draw, &self.particle_buffer) {
                let count = draw.particle_count.min(self.particle_capacity);
                if count > 0 {
                    render_pass.set_pipeline(&self.pipeline);
                    render_pass.set_bind_group(0, &self.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..FLAKE_VERTICES, 0..count);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
