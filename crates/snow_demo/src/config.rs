//! Demo configuration (window, starting camera, snow). Loaded from mapsnow.ron at startup.

use serde::{Deserialize, Serialize};
use snow_core::{SnowColor, SnowOptionsPatch};
use std::path::PathBuf;

/// Demo settings. Loaded from `mapsnow.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Starting camera center as `(longitude, latitude)` in degrees.
    #[serde(default = "default_center")]
    pub center: (f64, f64),
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Bearing in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Tilt in degrees.
    #[serde(default)]
    pub pitch: f64,
    /// Start snowing right away instead of waiting for the map to settle.
    #[serde(default)]
    pub skip_waiting_for_ready: bool,
    /// Snow options applied at startup on top of the defaults.
    #[serde(default)]
    pub snow: SnowOptionsPatch,
    /// Flake color as `rgba(r,g,b,a)`. Overrides `snow.color`.
    #[serde(default)]
    pub color: Option<String>,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_center() -> (f64, f64) {
    (82.920412, 55.030111)
}
fn default_zoom() -> f64 {
    15.0
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            center: default_center(),
            zoom: default_zoom(),
            rotation: 0.0,
            pitch: 0.0,
            skip_waiting_for_ready: false,
            snow: SnowOptionsPatch::default(),
            color: None,
        }
    }
}

impl DemoConfig {
    /// Load config from `mapsnow.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Snow patch to apply at startup. A bad `color` string is logged and skipped.
    pub fn initial_patch(&self) -> SnowOptionsPatch {
        let mut patch = self.snow.clone();
        if let Some(text) = &self.color {
            match text.parse::<SnowColor>() {
                Ok(color) => patch.color = Some(color),
                Err(e) => log::warn!("{}", e),
            }
        }
        patch
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("mapsnow.ron")
}
