// filepath: src/error.rs
//! Error types for mu-canvas

use thiserror::Error;

/// Failures of the one-time atlas setup. The host cannot draw icons without
/// the atlas, so these are meant to end startup.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to decode atlas image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("atlas texture has not been set up")]
    NotLoaded,
}

/// Per-command failures reported by a render backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("invalid icon id {0}")]
    InvalidIcon(u32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
