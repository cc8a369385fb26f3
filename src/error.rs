//! Error types for donegate.

use std::path::PathBuf;

use thiserror::Error;

/// Crate error type.
///
/// Used by the CLI, config and decision log paths. Checkers report their
/// failures through [`crate::checks::CheckError`] instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid hook event: {0}")]
    InvalidEvent(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
