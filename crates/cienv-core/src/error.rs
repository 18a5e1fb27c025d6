//! Error types for cienv-core

use cienv_host::HostError;
use thiserror::Error;

/// Why a value could not be redirected to the workspace file.
///
/// Always recoverable: the caller injects the original value instead.
#[derive(Error, Debug)]
pub enum RedirectError {
    /// The run has a workspace handle, but no workspace behind it
    #[error("run {run_id} has no workspace")]
    NoWorkspace { run_id: String },

    /// The run has no persisted root directory to derive a workspace from
    #[error("run {run_id} has no root directory")]
    NoRootDir { run_id: String },

    /// The pointer variable is reserved or already set
    #[error("pointer variable {name} is reserved or already set")]
    PointerUnavailable { name: String },

    /// Writing the file failed
    #[error("failed to write message file: {0}")]
    Write(#[from] HostError),
}

/// Errors from loading contributor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
