//! Error types for the renderer

use thiserror::Error;

/// Result type alias using the renderer's error type
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised while bringing up the window, surface or GPU
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to find a suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to build scene geometry: {0}")]
    Geometry(#[from] kaleido_core::Error),
}
