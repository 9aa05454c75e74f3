//! Snow appearance options and partial updates to them.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hard cap on the number of particles in the field.
pub const MAX_PARTICLES: u32 = 100_000;

/// Flake color: `r`, `g`, `b` in `0..=255`, `a` in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnowColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl SnowColor {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// RGBA with every channel in `0..=1`, as the shader wants it.
    pub fn normalized(&self) -> [f32; 4] {
        [
            (self.r / 255.0) as f32,
            (self.g / 255.0) as f32,
            (self.b / 255.0) as f32,
            self.a as f32,
        ]
    }
}

impl Default for SnowColor {
    fn default() -> Self {
        Self::new(255.0, 255.0, 255.0, 0.7)
    }
}

/// Why an `rgba(...)` string was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    #[error("bad color {0:?}, need to be \"rgba(255,255,255,1)\"")]
    NotRgba(String),
    #[error("bad color {input:?}: expected 4 components, got {count}")]
    ComponentCount { input: String, count: usize },
    #[error("bad color {input:?}: {component:?} is not a number")]
    NotANumber { input: String, component: String },
}

impl FromStr for SnowColor {
    type Err = ColorParseError;

    /// Parse `rgba(r,g,b,a)`. Channel ranges are not checked.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
            .filter(|inner| !inner.is_empty())
            .ok_or_else(|| ColorParseError::NotRgba(s.to_string()))?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ColorParseError::ComponentCount {
                input: s.to_string(),
                count: parts.len(),
            });
        }

        let mut rgba = [0.0; 4];
        for (slot, part) in rgba.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .ok_or_else(|| ColorParseError::NotANumber {
                    input: s.to_string(),
                    component: part.to_string(),
                })?;
        }

        Ok(Self::new(rgba[0], rgba[1], rgba[2], rgba[3]))
    }
}

/// Full snapshot of the snow options.
///
/// Values are stored as given. Nothing here is range-checked: a negative
/// `particle_number` simply draws nothing and a NaN zoom bound hides the snow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowOptions {
    /// Amplitude of each flake's own oscillation, in world units.
    pub dispersion: f64,
    /// Flakes to draw. Clamped to `[0, MAX_PARTICLES]` when drawing.
    pub particle_number: i64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    /// Positive values fall down.
    pub velocity_z: f64,
    /// Flake size in CSS pixels.
    pub size: f64,
    pub color: SnowColor,
    /// At or below this zoom no snow is drawn.
    pub min_zoom: f64,
}

impl Default for SnowOptions {
    fn default() -> Self {
        Self {
            dispersion: 50.0,
            particle_number: 50_000,
            velocity_x: 0.0,
            velocity_y: 0.0,
            velocity_z: 500.0,
            size: 6.0,
            color: SnowColor::default(),
            min_zoom: 9.0,
        }
    }
}

impl SnowOptions {
    /// New snapshot with every field set in `patch` overwritten.
    pub fn apply(&self, patch: &SnowOptionsPatch) -> Self {
        Self {
            dispersion: patch.dispersion.unwrap_or(self.dispersion),
            particle_number: patch.particle_number.unwrap_or(self.particle_number),
            velocity_x: patch.velocity_x.unwrap_or(self.velocity_x),
            velocity_y: patch.velocity_y.unwrap_or(self.velocity_y),
            velocity_z: patch.velocity_z.unwrap_or(self.velocity_z),
            size: patch.size.unwrap_or(self.size),
            color: patch.color.unwrap_or(self.color),
            min_zoom: patch.min_zoom.unwrap_or(self.min_zoom),
        }
    }

    /// Constant wind in world space. Z is negated: positive `velocity_z` falls.
    pub fn wind(&self) -> DVec3 {
        DVec3::new(self.velocity_x, self.velocity_y, -self.velocity_z)
    }

    /// Number of particles a draw call covers.
    pub fn draw_count(&self) -> u32 {
        self.particle_number.clamp(0, i64::from(MAX_PARTICLES)) as u32
    }

    /// Whether anything is drawn at `zoom`.
    pub fn is_visible_at(&self, zoom: f64) -> bool {
        zoom > self.min_zoom && self.particle_number > 0
    }

    /// Flake size at `zoom`, shrinking linearly to zero over the last zoom level above `min_zoom`.
    pub fn flake_size(&self, zoom: f64) -> f64 {
        let fade_end = self.min_zoom + 1.0;
        if zoom < fade_end {
            self.size - self.size * (fade_end - zoom)
        } else {
            self.size
        }
    }
}

/// Partial update to [`SnowOptions`]. Unset fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowOptionsPatch {
    pub dispersion: Option<f64>,
    pub particle_number: Option<i64>,
    pub velocity_x: Option<f64>,
    pub velocity_y: Option<f64>,
    pub velocity_z: Option<f64>,
    pub size: Option<f64>,
    pub color: Option<SnowColor>,
    pub min_zoom: Option<f64>,
}

macro_rules! patch_setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, value: $ty) -> Self {
                self.$field = Some(value);
                self
            }
        )*
    };
}

impl SnowOptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    patch_setters! {
        dispersion: f64,
        particle_number: i64,
        velocity_x: f64,
        velocity_y: f64,
        velocity_z: f64,
        size: f64,
        color: SnowColor,
        min_zoom: f64,
    }

    /// Patch that sets every field to the values in `options`.
    pub fn from_options(options: &SnowOptions) -> Self {
        Self {
            dispersion: Some(options.dispersion),
            particle_number: Some(options.particle_number),
            velocity_x: Some(options.velocity_x),
            velocity_y: Some(options.velocity_y),
            velocity_z: Some(options.velocity_z),
            size: Some(options.size),
            color: Some(options.color),
            min_zoom: Some(options.min_zoom),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_apply_overwrites_only_set_fields() {
        let base = SnowOptions::default();
        let next = base.apply(&SnowOptionsPatch::new().velocity_z(120.0).size(3.0));
        assert_eq!(next.velocity_z, 120.0);
        assert_eq!(next.size, 3.0);
        assert_eq!(next.dispersion, base.dispersion);
        assert_eq!(next.color, base.color);
        assert_eq!(base.apply(&SnowOptionsPatch::new()), base);
    }

    #[test]
    fn options_patch_is_empty_until_a_field_is_set() {
        assert!(SnowOptionsPatch::new().is_empty());
        assert!(!SnowOptionsPatch::new().dispersion(20.0).is_empty());
    }

    #[test]
    fn options_patch_from_options_restores_snapshot() {
        let custom = SnowOptions {
            particle_number: 7,
            min_zoom: 3.0,
            ..Default::default()
        };
        let patch = SnowOptionsPatch::from_options(&custom);
        assert_eq!(SnowOptions::default().apply(&patch), custom);
    }

    #[test]
    fn options_wind_negates_vertical() {
        let o = SnowOptions {
            velocity_x: 1.0,
            velocity_y: -2.0,
            velocity_z: 500.0,
            ..Default::default()
        };
        assert_eq!(o.wind(), DVec3::new(1.0, -2.0, -500.0));
    }

    #[test]
    fn options_draw_count_clamps_to_capacity() {
        let with = |n| SnowOptions {
            particle_number: n,
            ..Default::default()
        };
        assert_eq!(with(0).draw_count(), 0);
        assert_eq!(with(-25).draw_count(), 0);
        assert_eq!(with(1234).draw_count(), 1234);
        assert_eq!(with(i64::from(MAX_PARTICLES)).draw_count(), MAX_PARTICLES);
        assert_eq!(with(5_000_000).draw_count(), MAX_PARTICLES);
    }

    #[test]
    fn options_flake_size_fades_near_min_zoom() {
        let o = SnowOptions::default(); // size 6, min_zoom 9
        assert_eq!(o.flake_size(12.0), 6.0);
        assert_eq!(o.flake_size(10.0), 6.0);
        assert!((o.flake_size(9.5) - 3.0).abs() < 1e-9);
        assert!((o.flake_size(9.25) - 1.5).abs() < 1e-9);
        assert!(o.flake_size(9.0).abs() < 1e-9);

        let mut prev = o.flake_size(9.0);
        for i in 1..=10 {
            let size = o.flake_size(9.0 + i as f64 * 0.1);
            assert!(size > prev);
            prev = size;
        }
    }

    #[test]
    fn options_visibility_needs_zoom_and_particles() {
        let o = SnowOptions::default();
        assert!(!o.is_visible_at(9.0));
        assert!(o.is_visible_at(9.01));
        let empty = SnowOptions {
            particle_number: 0,
            ..Default::default()
        };
        assert!(!empty.is_visible_at(15.0));
        let nan = SnowOptions {
            min_zoom: f64::NAN,
            ..Default::default()
        };
        assert!(!nan.is_visible_at(15.0));
    }

    #[test]
    fn color_parses_rgba() {
        let c: SnowColor = " rgba(255, 128,0,0.5) ".parse().unwrap();
        assert_eq!(c, SnowColor::new(255.0, 128.0, 0.0, 0.5));
        let [r, g, b, a] = c.normalized();
        assert_eq!((r, b, a), (1.0, 0.0, 0.5));
        assert!((g - 0.502).abs() < 1e-3);
    }

    #[test]
    fn color_rejects_malformed_input() {
        assert!(matches!("rgb(1,2,3)".parse::<SnowColor>(), Err(ColorParseError::NotRgba(_))));
        assert!(matches!("rgba()".parse::<SnowColor>(), Err(ColorParseError::NotRgba(_))));
        assert!(matches!(
            "rgba(1,2,3)".parse::<SnowColor>(),
            Err(ColorParseError::ComponentCount { count: 3, .. })
        ));
        assert!(matches!(
            "rgba(1,x,3,1)".parse::<SnowColor>(),
            Err(ColorParseError::NotANumber { .. })
        ));
    }
}
