//! A stand-in map camera the demo moves around with the keyboard.

use glam::{DVec2, DVec3};
use snow_core::{project_geo_to_map, unproject_map_to_geo, TILE_SIZE, WORLD_SIZE};
use snow_renderer::{MapEvent, MapHost};

const MIN_ZOOM: f64 = 2.0;
const MAX_ZOOM: f64 = 22.0;
const MAX_PITCH: f64 = 60.0;

/// Frames the map takes to "load" before it reports idle.
const LOAD_FRAMES: u32 = 30;

/// Map camera with no tiles behind it.
#[derive(Debug, Clone)]
pub struct SimulatedMap {
    center: DVec2,
    zoom: f64,
    rotation: f64,
    pitch: f64,
    size: DVec2,
    pixel_ratio: f64,
    frames: u32,
    idle_sent: bool,
}

impl SimulatedMap {
    pub fn new(center: DVec2, zoom: f64, size: DVec2, pixel_ratio: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            rotation: 0.0,
            pitch: 0.0,
            size,
            pixel_ratio,
            frames: 0,
            idle_sent: false,
        }
    }

    /// Move the center by `screen` logical pixels (x right, y down) in the current bearing.
    pub fn pan(&mut self, screen: DVec2) {
        let units_per_pixel = WORLD_SIZE / (TILE_SIZE * 2f64.powf(self.zoom));
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        // Screen right is east rotated by the bearing, screen down is south.
        let east = screen.x * cos - screen.y * sin;
        let north = -screen.x * sin - screen.y * cos;

        let half = WORLD_SIZE / 2.0;
        let mut world = project_geo_to_map(self.center)
            + DVec3::new(east, north, 0.0) * units_per_pixel;
        world.y = world.y.clamp(-half, half);
        self.center = unproject_map_to_geo(world);
        self.center.x = snow_core::modulo(self.center.x + 180.0, 360.0) - 180.0;
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation = snow_core::modulo(self.rotation + degrees, 360.0);
    }

    pub fn tilt_by(&mut self, degrees: f64) {
        self.pitch = (self.pitch + degrees).clamp(0.0, MAX_PITCH);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = snow_core::modulo(degrees, 360.0);
    }

    pub fn set_pitch(&mut self, degrees: f64) {
        self.pitch = degrees.clamp(0.0, MAX_PITCH);
    }

    /// Take a new viewport size and return the event to forward.
    pub fn resize(&mut self, size: DVec2, pixel_ratio: f64) -> MapEvent {
        self.size = size;
        self.pixel_ratio = pixel_ratio;
        MapEvent::Resize { size, pixel_ratio }
    }

    /// Count a rendered frame. Returns [`MapEvent::Idle`] once, when loading is done.
    pub fn tick(&mut self) -> Option<MapEvent> {
        self.frames = self.frames.saturating_add(1);
        if !self.idle_sent && self.frames >= LOAD_FRAMES {
            self.idle_sent = true;
            log::info!("Map idle after {} frames", self.frames);
            return Some(MapEvent::Idle);
        }
        None
    }
}

impl MapHost for SimulatedMap {
    fn center(&self) -> DVec2 {
        self.center
    }
    fn zoom(&self) -> f64 {
        self.zoom
    }
    fn rotation(&self) -> f64 {
        self.rotation
    }
    fn pitch(&self) -> f64 {
        self.pitch
    }
    fn size(&self) -> DVec2 {
        self.size
    }
    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}
