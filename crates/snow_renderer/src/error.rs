//! Errors raised by the snow renderer.

use thiserror::Error;

/// GPU setup and per-frame failures.
///
/// Setup variants are fatal: the overlay cannot exist without a device and a
/// configured surface. `Surface` comes from frame acquisition and is usually
/// recoverable by reconfiguring.
#[derive(Debug, Error)]
pub enum SnowError {
    #[error("failed to create render surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to find a suitable GPU adapter")]
    NoAdapter,
    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface does not support any texture format")]
    NoSurfaceFormat,
    #[error("failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl SnowError {
    /// Whether the overlay can't keep drawing. A skipped frame is caught up
    /// by the next one; running out of memory is not.
    pub fn is_fatal(&self) -> bool {
        match self {
            SnowError::Surface(wgpu::SurfaceError::OutOfMemory) => true,
            SnowError::Surface(_) => false,
            _ => true,
        }
    }
}

pub type Result<T, E = SnowError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_only_out_of_memory_frames_are_fatal() {
        assert!(SnowError::Surface(wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert!(!SnowError::Surface(wgpu::SurfaceError::Timeout).is_fatal());
        assert!(!SnowError::Surface(wgpu::SurfaceError::Lost).is_fatal());
        assert!(SnowError::NoAdapter.is_fatal());
    }
}
