//! Snow overlay renderer for map viewports.
//!
//! [`Snow`] owns the option state and per-frame update and talks to the GPU
//! through a [`SnowBackend`]; [`WgpuSnowBackend`] is the wgpu implementation.

pub mod backend;
pub mod error;
pub mod gpu;
pub mod host;
pub mod pipeline;
pub mod snow;
pub mod vertex;

pub use backend::*;
pub use error::*;
pub use gpu::*;
pub use host::*;
pub use pipeline::*;
pub use snow::*;
pub use vertex::*;
