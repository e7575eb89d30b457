//! Error types
//!
//! Only construction-time operations return errors. Per-tick calls (render,
//! pointer handling, stress dispatch) absorb bad input and degrade instead.

use thiserror::Error;

/// Errors raised while setting up a compute backend
#[derive(Debug, Error)]
pub enum ComputeError {
    /// No adapter matched the request (headless machine, no GPU driver)
    #[error("no compatible GPU adapter found")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to hand out a device
    #[error("failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// Method name did not match any known array layout
    #[error("unknown compute method '{0}' (expected 'interleaved' or 'planar')")]
    UnknownMethod(String),
}
