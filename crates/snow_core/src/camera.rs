//! Map camera pose and the eye/view-projection derived from it.

use crate::geo::{zoom_to_height, FOV_DEGREES, MIN_SCREEN_HEIGHT};
use glam::{DMat4, DVec2, DVec3};

/// Snapshot of a map camera, in map world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapState {
    /// Point the camera looks at.
    pub center: DVec3,
    /// Fractional zoom level.
    pub zoom: f64,
    /// Bearing in radians, clockwise from north.
    pub rotation: f64,
    /// Tilt from the vertical in radians.
    pub pitch: f64,
    /// Viewport size in logical pixels.
    pub size: DVec2,
}

impl MapState {
    /// Camera distance to the center for this zoom and viewport.
    pub fn height(&self) -> f64 {
        zoom_to_height(self.zoom, self.size)
    }

    /// Eye position: `height * sin(pitch)` back along the bearing, `height * cos(pitch)` up.
    ///
    /// The horizontal offset never drops below one world unit so the eye
    /// and the center can't coincide when looking straight down.
    pub fn eye_position(&self) -> DVec3 {
        let height = self.height();
        let offset = (height * self.pitch.sin()).max(1.0);
        DVec3::new(
            self.center.x + self.rotation.sin() * offset,
            self.center.y - self.rotation.cos() * offset,
            height * self.pitch.cos(),
        )
    }

    /// Screen-up direction in world space, perpendicular to the view direction.
    fn up(&self) -> DVec3 {
        let (sin_r, cos_r) = self.rotation.sin_cos();
        let (sin_p, cos_p) = self.pitch.sin_cos();
        DVec3::new(-sin_r * cos_p, cos_r * cos_p, sin_p)
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye_position(), self.center, self.up())
    }

    /// Projection for a viewport padded to at least [`MIN_SCREEN_HEIGHT`] pixels,
    /// cropped back to the visible band.
    pub fn projection_matrix(&self, near: f64, far: f64) -> DMat4 {
        let padded_height = self.size.y.max(MIN_SCREEN_HEIGHT);
        let visible_height = self.size.y.max(1.0);
        let aspect = self.size.x.max(1.0) / padded_height;

        let projection = DMat4::perspective_rh(FOV_DEGREES.to_radians(), aspect, near, far);
        // The visible band sits in the middle of the padded frame, so the
        // crop is a pure vertical scale in NDC.
        let crop = DMat4::from_scale(DVec3::new(1.0, padded_height / visible_height, 1.0));
        crop * projection
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection(&self, near: f64, far: f64) -> DMat4 {
        self.projection_matrix(near, far) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec4;

    fn state(rotation_deg: f64, pitch_deg: f64, size: DVec2) -> MapState {
        MapState {
            center: DVec3::new(1000.0, 2000.0, 0.0),
            zoom: 17.0,
            rotation: rotation_deg.to_radians(),
            pitch: pitch_deg.to_radians(),
            size,
        }
    }

    fn ndc(m: DMat4, p: DVec3) -> DVec3 {
        let clip = m * DVec4::new(p.x, p.y, p.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn eye_top_down_keeps_minimum_offset() {
        let s = state(0.0, 0.0, DVec2::new(1280.0, 1024.0));
        let eye = s.eye_position();
        assert!((eye.x - 1000.0).abs() < 1e-9);
        assert!((eye.y - 1999.0).abs() < 1e-9);
        assert!((eye.z - s.height()).abs() < 1e-9);
    }

    #[test]
    fn eye_pitched_moves_back_along_bearing() {
        let s = state(90.0, 60.0, DVec2::new(1280.0, 1024.0));
        let eye = s.eye_position();
        let h = s.height();
        // Bearing 90°: the eye sits east of the center.
        assert!((eye.x - (1000.0 + h * 60f64.to_radians().sin())).abs() < 1e-6);
        assert!((eye.y - 2000.0).abs() < 1e-6);
        assert!((eye.z - h * 0.5).abs() < 1e-6);
    }

    #[test]
    fn view_projection_centers_target() {
        for (rot, pitch) in [(0.0, 0.0), (45.0, 30.0), (-120.0, 60.0)] {
            let s = state(rot, pitch, DVec2::new(1280.0, 720.0));
            let p = ndc(s.view_projection(10.0, 1.0e7), s.center);
            assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6, "rot {rot} pitch {pitch}: {p:?}");
            assert!(p.z > 0.0 && p.z < 1.0);
        }
    }

    #[test]
    fn view_projection_north_is_up_without_rotation() {
        let s = state(0.0, 40.0, DVec2::new(1280.0, 1024.0));
        let north = s.center + DVec3::new(0.0, 50.0, 0.0);
        let east = s.center + DVec3::new(50.0, 0.0, 0.0);
        let vp = s.view_projection(10.0, 1.0e7);
        assert!(ndc(vp, north).y > 0.0);
        assert!(ndc(vp, east).x > 0.0);
    }

    #[test]
    fn view_projection_pads_short_viewports() {
        let tall = state(0.0, 30.0, DVec2::new(1200.0, 1000.0));
        let short = MapState {
            size: DVec2::new(1200.0, 500.0),
            ..tall
        };
        let p = tall.center + DVec3::new(30.0, 40.0, 0.0);
        let a = ndc(tall.view_projection(10.0, 1.0e7), p);
        let b = ndc(short.view_projection(10.0, 1.0e7), p);
        // Same horizontal scale, the short viewport shows half the vertical band.
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((b.y - 2.0 * a.y).abs() < 1e-9);
    }
}
