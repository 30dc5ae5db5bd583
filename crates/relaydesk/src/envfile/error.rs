//! Env file error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for env file operations.
pub type EnvFileResult<T> = Result<T, EnvFileError>;

/// Errors that can occur during env file operations.
#[derive(Debug, Error)]
pub enum EnvFileError {
    /// Target file does not exist.
    #[error("env file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
