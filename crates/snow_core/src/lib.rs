//! Core types for map snow: projection and camera math, options, and the snow world state.
//!
//! This crate has no GPU dependencies:
//! - Web-Mercator projection and zoom/height conversion
//! - Map camera pose to eye position and view-projection
//! - Snow options and partial updates
//! - Snow cube tracking and wind drift

pub mod camera;
pub mod clock;
pub mod geo;
pub mod options;
pub mod world;

pub use camera::*;
pub use clock::*;
pub use geo::*;
pub use options::*;
pub use world::*;

// Re-export commonly used types
pub use glam::{DMat4, DVec2, DVec3, Mat4, Vec3};
