//! Procedural generation for the snow particle field.

pub mod field;
pub mod lcg;

pub use field::*;
pub use lcg::*;
