//! Error types for droidconf settings
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Errors raised while loading or saving settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Duplicate signing profile '{name}'")]
    DuplicateProfile { name: String },
}

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;
