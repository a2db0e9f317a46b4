//! Error types for Kaleido

use thiserror::Error;

/// Result type alias using Kaleido's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building demo geometry
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough points survived extraction to build a triangulation
    #[error("Triangulation failed: {0}")]
    Triangulation(String),
}
