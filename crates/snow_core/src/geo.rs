//! Geographic projection and zoom/height conversions for the map world space.

use glam::{DVec2, DVec3};

/// Side of the square map world in world units (2^32).
pub const WORLD_SIZE: f64 = 4_294_967_296.0;
/// World units covered by one tile at zoom 0.
pub const TILE_SIZE: f64 = 256.0;
/// Vertical field of view of the map camera in degrees.
pub const FOV_DEGREES: f64 = 60.0;
/// Viewports shorter than this are treated as this tall so the FOV stays consistent.
pub const MIN_SCREEN_HEIGHT: f64 = 1000.0;

/// Floored modulo, same as GLSL `mod`. Unlike `%` the result has the sign of `y`.
pub fn modulo(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

/// Project a `(longitude, latitude)` pair in degrees onto the map plane.
///
/// Web-Mercator into a square of side [`WORLD_SIZE`] centered on the origin.
/// Both axes are clamped to `[-WORLD_SIZE / 2, WORLD_SIZE / 2]`, so the poles
/// land on the world edge instead of at infinity. `z` is always zero.
pub fn project_geo_to_map(lng_lat: DVec2) -> DVec3 {
    let world_half = WORLD_SIZE / 2.0;
    let sin = lng_lat.y.to_radians().sin();

    let x = lng_lat.x * WORLD_SIZE / 360.0;
    let y = ((1.0 + sin) / (1.0 - sin)).ln() * WORLD_SIZE / (4.0 * std::f64::consts::PI);

    DVec3::new(
        x.clamp(-world_half, world_half),
        y.clamp(-world_half, world_half),
        0.0,
    )
}

/// Inverse of [`project_geo_to_map`] for points inside the world square.
pub fn unproject_map_to_geo(point: DVec3) -> DVec2 {
    let lng = point.x * 360.0 / WORLD_SIZE;
    let lat = (point.y * 2.0 * std::f64::consts::PI / WORLD_SIZE).tanh().asin();
    DVec2::new(lng, lat.to_degrees())
}

/// Camera distance (in world units) that shows `zoom` on a viewport of `size` pixels.
pub fn zoom_to_height(zoom: f64, size: DVec2) -> f64 {
    let screen_height = size.y.max(MIN_SCREEN_HEIGHT);
    screen_height * WORLD_SIZE
        / (2.0 * TILE_SIZE * (FOV_DEGREES.to_radians() / 2.0).tan() * 2f64.powf(zoom))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: f64 = WORLD_SIZE / 2.0;

    #[test]
    fn modulo_follows_divisor_sign() {
        assert_eq!(modulo(5.5, 2.0), 1.5);
        assert_eq!(modulo(-0.5, 2.0), 1.5);
        assert_eq!(modulo(-4.0, 2.0), 0.0);
        assert!((modulo(0.3, 1.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn project_origin_is_world_center() {
        let p = project_geo_to_map(DVec2::ZERO);
        assert_eq!(p, DVec3::ZERO);
    }

    #[test]
    fn project_antimeridian_reaches_world_edge() {
        assert_eq!(project_geo_to_map(DVec2::new(180.0, 0.0)).x, HALF);
        assert_eq!(project_geo_to_map(DVec2::new(-180.0, 0.0)).x, -HALF);
    }

    #[test]
    fn project_poles_are_clamped() {
        assert_eq!(project_geo_to_map(DVec2::new(0.0, 90.0)).y, HALF);
        assert_eq!(project_geo_to_map(DVec2::new(0.0, -90.0)).y, -HALF);
        // Out-of-range longitudes are clamped too.
        assert_eq!(project_geo_to_map(DVec2::new(400.0, 0.0)).x, HALF);
    }

    #[test]
    fn project_is_symmetric_in_latitude() {
        let north = project_geo_to_map(DVec2::new(82.92, 55.03));
        let south = project_geo_to_map(DVec2::new(82.92, -55.03));
        assert!((north.y + south.y).abs() < 1e-3);
        assert!(north.y > 0.0);
    }

    #[test]
    fn unproject_inverts_projection() {
        let geo = DVec2::new(82.920412, 55.030111);
        let back = unproject_map_to_geo(project_geo_to_map(geo));
        assert!((back - geo).length() < 1e-9);
    }

    #[test]
    fn zoom_to_height_halves_per_zoom_level() {
        let size = DVec2::new(1920.0, 1080.0);
        let h15 = zoom_to_height(15.0, size);
        let h16 = zoom_to_height(16.0, size);
        assert!((h15 / h16 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_to_height_floors_short_viewports() {
        let short = zoom_to_height(19.0, DVec2::new(800.0, 300.0));
        let floor = zoom_to_height(19.0, DVec2::new(800.0, MIN_SCREEN_HEIGHT));
        assert_eq!(short, floor);
        // 1000 * 2^32 / (512 * tan(30°) * 2^19)
        assert!((floor - 27_712.812_921).abs() < 1e-3);
    }
}
