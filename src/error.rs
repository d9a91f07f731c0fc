use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum AppError {
    #[error("TOML config file error: {0}")]
    TomlConfig(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image collection failed: {0}")]
    ImageCollection(String),

    #[error("Failed to delete {path:?} after {deleted} deletions: {source}")]
    Deletion {
        path: PathBuf,
        deleted: usize,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type with default AppError
pub type Result<T, E = AppError> = std::result::Result<T, E>;
