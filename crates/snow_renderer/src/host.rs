//! What the snow needs from the map it is drawn over.

use glam::{DVec2, DVec3};
use snow_core::{project_geo_to_map, MapState};

/// Read access to the host map camera.
///
/// Angles are reported in degrees as map APIs usually do; [`MapHost::map_state`]
/// converts them to a [`MapState`] in world units and radians.
pub trait MapHost {
    /// Camera center as `(longitude, latitude)` in degrees.
    fn center(&self) -> DVec2;
    /// Fractional zoom level.
    fn zoom(&self) -> f64;
    /// Bearing in degrees.
    fn rotation(&self) -> f64;
    /// Tilt in degrees.
    fn pitch(&self) -> f64;
    /// Viewport size in logical pixels.
    fn size(&self) -> DVec2;
    /// Physical pixels per logical pixel.
    fn pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Center projected into map world space.
    fn world_center(&self) -> DVec3 {
        project_geo_to_map(self.center())
    }

    /// Snapshot of the camera for this frame.
    fn map_state(&self) -> MapState {
        MapState {
            center: self.world_center(),
            zoom: self.zoom(),
            rotation: self.rotation().to_radians(),
            pitch: self.pitch().to_radians(),
            size: self.size(),
        }
    }
}

/// Notifications the host forwards to the snow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The map finished its first load and went idle. Only the first one matters.
    Idle,
    /// The viewport changed size.
    Resize { size: DVec2, pixel_ratio: f64 },
}
