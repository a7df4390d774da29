//! droidconf Core - settings and shared types
//!
//! This crate owns the user-level settings file: SDK defaults handed to the
//! resolver, the signing profiles the registry is built from, and the
//! preferred log level.

pub mod config;
pub mod error;

pub use config::{KeyStoreType, ProfileEntry, SdkDefaults, Settings, SigningSettings};
pub use error::{Result, SettingsError};

/// droidconf version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "droidconf";
