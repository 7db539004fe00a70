use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the viewer library
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to create drawing surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface does not support rendering on this adapter")]
    UnsupportedSurface,

    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("{0} was already released")]
    AlreadyReleased(&'static str),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("shape id counter is exhausted")]
    IdsExhausted,

    #[error("failed to access shape file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed shape file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
