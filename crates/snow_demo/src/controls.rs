//! Keyboard bindings for the snow options and the simulated camera.

use crate::map::SimulatedMap;
use glam::DVec2;
use snow_core::{SnowColor, SnowOptions, SnowOptionsPatch};
use winit::keyboard::KeyCode;

const DISPERSION_RANGE: (f64, f64) = (0.0, 2500.0);
const VELOCITY_RANGE: (f64, f64) = (-5000.0, 5000.0);
const PARTICLE_RANGE: (i64, i64) = (0, 100_000);
const SIZE_RANGE: (f64, f64) = (0.0, 50.0);
const MIN_ZOOM_RANGE: (f64, f64) = (0.0, 20.0);

const PAN_PIXELS: f64 = 50.0;
const ZOOM_STEP: f64 = 0.25;
const ANGLE_STEP: f64 = 5.0;

/// Colors cycled with `C`.
const COLOR_PRESETS: [&str; 4] = [
    "rgba(255,255,255,0.7)",
    "rgba(190,215,255,0.9)",
    "rgba(255,205,225,0.8)",
    "rgba(255,255,255,1)",
];

pub const HELP: &str = "\
  1/2 dispersion    3/4 velocity X    5/6 velocity Y    7/8 velocity Z
  9/0 particles     [/] size          ,/. min zoom      C   color
  R   reset snow    X   stop snow
  Arrows pan        -/= zoom          Q/E rotate        W/S pitch
  Esc quit";

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Snow(SnowOptionsPatch),
    StopSnow,
    Quit,
}

fn step(value: f64, delta: f64, (min, max): (f64, f64)) -> f64 {
    (value + delta).clamp(min, max)
}

fn next_color(current: SnowColor) -> SnowColor {
    let presets: Vec<SnowColor> = COLOR_PRESETS
        .iter()
        .filter_map(|text| match text.parse() {
            Ok(color) => Some(color),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
        .collect();
    let next = presets
        .iter()
        .position(|c| *c == current)
        .map_or(0, |i| (i + 1) % presets.len());
    presets.get(next).copied().unwrap_or_default()
}

/// Snow option change bound to `key`, if any.
pub fn snow_action(key: KeyCode, options: &SnowOptions) -> Option<Action> {
    let patch = SnowOptionsPatch::new();
    let patch = match key {
        KeyCode::Digit1 => patch.dispersion(step(options.dispersion, -50.0, DISPERSION_RANGE)),
        KeyCode::Digit2 => patch.dispersion(step(options.dispersion, 50.0, DISPERSION_RANGE)),
        KeyCode::Digit3 => patch.velocity_x(step(options.velocity_x, -250.0, VELOCITY_RANGE)),
        KeyCode::Digit4 => patch.velocity_x(step(options.velocity_x, 250.0, VELOCITY_RANGE)),
        KeyCode::Digit5 => patch.velocity_y(step(options.velocity_y, -250.0, VELOCITY_RANGE)),
        KeyCode::Digit6 => patch.velocity_y(step(options.velocity_y, 250.0, VELOCITY_RANGE)),
        KeyCode::Digit7 => patch.velocity_z(step(options.velocity_z, -250.0, VELOCITY_RANGE)),
        KeyCode::Digit8 => patch.velocity_z(step(options.velocity_z, 250.0, VELOCITY_RANGE)),
        KeyCode::Digit9 => patch.particle_number(
            (options.particle_number - 5000).clamp(PARTICLE_RANGE.0, PARTICLE_RANGE.1),
        ),
        KeyCode::Digit0 => patch.particle_number(
            (options.particle_number + 5000).clamp(PARTICLE_RANGE.0, PARTICLE_RANGE.1),
        ),
        KeyCode::BracketLeft => patch.size(step(options.size, -1.0, SIZE_RANGE)),
        KeyCode::BracketRight => patch.size(step(options.size, 1.0, SIZE_RANGE)),
        KeyCode::Comma => patch.min_zoom(step(options.min_zoom, -1.0, MIN_ZOOM_RANGE)),
        KeyCode::Period => patch.min_zoom(step(options.min_zoom, 1.0, MIN_ZOOM_RANGE)),
        KeyCode::KeyC => patch.color(next_color(options.color)),
        KeyCode::KeyR => SnowOptionsPatch::from_options(&SnowOptions::default()),
        KeyCode::KeyX => return Some(Action::StopSnow),
        KeyCode::Escape => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Snow(patch))
}

/// Apply the camera move bound to `key`. Returns whether `key` was a camera key.
pub fn camera_action(key: KeyCode, map: &mut SimulatedMap) -> bool {
    match key {
        KeyCode::ArrowLeft => map.pan(DVec2::new(-PAN_PIXELS, 0.0)),
        KeyCode::ArrowRight => map.pan(DVec2::new(PAN_PIXELS, 0.0)),
        KeyCode::ArrowUp => map.pan(DVec2::new(0.0, -PAN_PIXELS)),
        KeyCode::ArrowDown => map.pan(DVec2::new(0.0, PAN_PIXELS)),
        KeyCode::Minus => map.zoom_by(-ZOOM_STEP),
        KeyCode::Equal => map.zoom_by(ZOOM_STEP),
        KeyCode::KeyQ => map.rotate_by(-ANGLE_STEP),
        KeyCode::KeyE => map.rotate_by(ANGLE_STEP),
        KeyCode::KeyW => map.tilt_by(ANGLE_STEP),
        KeyCode::KeyS => map.tilt_by(-ANGLE_STEP),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use snow_renderer::MapHost;

    fn patch_for(key: KeyCode, options: &SnowOptions) -> SnowOptionsPatch {
        match snow_action(key, options) {
            Some(Action::Snow(patch)) => patch,
            other => panic!("expected a snow patch for {:?}, got {:?}", key, other),
        }
    }

    #[test]
    fn controls_step_and_clamp_options() {
        let options = SnowOptions::default();
        assert_eq!(patch_for(KeyCode::Digit2, &options).dispersion, Some(100.0));
        assert_eq!(patch_for(KeyCode::Digit8, &options).velocity_z, Some(750.0));
        assert_eq!(patch_for(KeyCode::Digit0, &options).particle_number, Some(55_000));

        let maxed = SnowOptions {
            particle_number: 100_000,
            size: 50.0,
            min_zoom: 0.0,
            ..SnowOptions::default()
        };
        assert_eq!(patch_for(KeyCode::Digit0, &maxed).particle_number, Some(100_000));
        assert_eq!(patch_for(KeyCode::BracketRight, &maxed).size, Some(50.0));
        assert_eq!(patch_for(KeyCode::Comma, &maxed).min_zoom, Some(0.0));
    }

    #[test]
    fn controls_cycle_color_presets() {
        let mut options = SnowOptions::default();
        let first = patch_for(KeyCode::KeyC, &options).color.unwrap();
        assert_eq!(first, SnowColor::new(190.0, 215.0, 255.0, 0.9));

        options.color = SnowColor::new(255.0, 255.0, 255.0, 1.0);
        let wrapped = patch_for(KeyCode::KeyC, &options).color.unwrap();
        assert_eq!(wrapped, SnowColor::default());

        options.color = SnowColor::new(1.0, 2.0, 3.0, 0.5);
        assert_eq!(patch_for(KeyCode::KeyC, &options).color, Some(SnowColor::default()));
    }

    #[test]
    fn controls_reset_and_special_keys() {
        let options = SnowOptions {
            dispersion: 900.0,
            ..SnowOptions::default()
        };
        let reset = patch_for(KeyCode::KeyR, &options);
        assert_eq!(options.apply(&reset), SnowOptions::default());
        assert_eq!(snow_action(KeyCode::KeyX, &options), Some(Action::StopSnow));
        assert_eq!(snow_action(KeyCode::Escape, &options), Some(Action::Quit));
        assert_eq!(snow_action(KeyCode::KeyZ, &options), None);
    }

    #[test]
    fn controls_move_camera() {
        let mut map = SimulatedMap::new(DVec2::new(0.0, 0.0), 15.0, DVec2::new(800.0, 600.0), 1.0);
        assert!(camera_action(KeyCode::Equal, &mut map));
        assert_eq!(map.zoom(), 15.25);
        assert!(camera_action(KeyCode::KeyW, &mut map));
        assert_eq!(map.pitch(), 5.0);
        assert!(camera_action(KeyCode::ArrowRight, &mut map));
        assert!(map.center().x > 0.0);
        assert!(!camera_action(KeyCode::Digit1, &mut map));
    }
}
