//! mapsnow: snow falling over a simulated map camera.
//!
//! There are no map tiles here, just a dark background under the flakes.
//! The camera behaves like a map camera (Web-Mercator center, zoom, bearing,
//! pitch) so the snow reacts to panning and zooming the way it does over a real map.

mod config;
mod controls;
mod map;

use anyhow::Result;
use glam::DVec2;
use snow_renderer::{MapHost, Snow, SnowInit, SnowState, WgpuSnowBackend};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use config::DemoConfig;
use controls::Action;
use map::SimulatedMap;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.10,
    b: 0.14,
    a: 1.0,
};

/// How often the window title is refreshed with frame stats.
const TITLE_INTERVAL: Duration = Duration::from_millis(500);

/// Everything that lives as long as the window.
struct DemoState {
    window: Arc<Window>,
    map: SimulatedMap,
    snow: Snow<WgpuSnowBackend>,
    running: bool,
    frames: u32,
    last_title: Instant,
}

impl DemoState {
    async fn new(window: Arc<Window>, config: &DemoConfig) -> Result<Self> {
        let physical = window.inner_size();
        let pixel_ratio = window.scale_factor();
        let logical = DVec2::new(f64::from(physical.width), f64::from(physical.height)) / pixel_ratio;

        let mut map = SimulatedMap::new(
            DVec2::new(config.center.0, config.center.1),
            config.zoom,
            logical,
            pixel_ratio,
        );
        map.set_rotation(config.rotation);
        map.set_pitch(config.pitch);

        let backend = WgpuSnowBackend::new(window.clone(), physical.width, physical.height)
            .await?
            .with_clear_color(BACKGROUND);

        let now = Instant::now();
        let mut snow = Snow::new(
            &map,
            backend,
            SnowInit {
                skip_waiting_for_ready: config.skip_waiting_for_ready,
            },
            now,
        );
        snow.set_options(config.initial_patch(), now);

        Ok(Self {
            window,
            map,
            snow,
            running: true,
            frames: 0,
            last_title: now,
        })
    }

    /// Handle a window event. Returns true if the app should exit.
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
            }
            WindowEvent::Resized(size) => {
                let pixel_ratio = self.window.scale_factor();
                let logical = DVec2::new(f64::from(size.width), f64::from(size.height)) / pixel_ratio;
                let event = self.map.resize(logical, pixel_ratio);
                self.snow.handle_map_event(event, Instant::now());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state.is_pressed() {
                        self.handle_key(key);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                self.window.request_redraw();
            }
            _ => {}
        }
        !self.running
    }

    fn handle_key(&mut self, key: winit::keyboard::KeyCode) {
        if controls::camera_action(key, &mut self.map) {
            return;
        }
        match controls::snow_action(key, self.snow.options()) {
            Some(Action::Snow(patch)) => {
                log::info!("Snow options: {:?}", patch);
                self.snow.set_options(patch, Instant::now());
            }
            Some(Action::StopSnow) => self.snow.stop(),
            Some(Action::Quit) => self.running = false,
            None => {}
        }
    }

    fn render(&mut self) {
        let now = Instant::now();
        if let Some(event) = self.map.tick() {
            self.snow.handle_map_event(event, now);
        }

        let stats = match self.snow.frame(&self.map, now) {
            Ok(stats) => stats,
            Err(e) if e.is_fatal() => {
                log::error!("Snow frame failed: {}", e);
                self.running = false;
                return;
            }
            Err(e) => {
                log::warn!("Snow frame dropped: {}", e);
                return;
            }
        };

        self.frames += 1;
        let elapsed = now.duration_since(self.last_title);
        if elapsed >= TITLE_INTERVAL {
            let fps = f64::from(self.frames) / elapsed.as_secs_f64();
            let state = match self.snow.state() {
                SnowState::WaitingForMapReady => "loading",
                SnowState::Active => "snowing",
                SnowState::Stopped => "stopped",
            };
            self.window.set_title(&format!(
                "mapsnow | {} | zoom {:.2} | {} flakes | {:.0} fps",
                state,
                self.map.zoom(),
                stats.particle_count,
                fps
            ));
            self.frames = 0;
            self.last_title = now;
        }
    }
}

/// Application handler for winit.
struct App {
    state: Option<DemoState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = DemoConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("mapsnow")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(DemoState::new(window.clone(), &config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize snow: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("mapsnow controls:");
    println!("{}", controls::HELP);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
