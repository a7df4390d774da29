//! droidconf - Android build-configuration resolver
//!
//! Reads a declarative build configuration (application id, SDK levels,
//! ABI filters, no-compress extensions, signing references), validates it,
//! and emits the normalized record an external build pipeline consumes.
//!
//! ## Architecture
//!
//! - `droidconf-core`: user settings and their error type
//! - `droidconf-build-engine`: declarations, signing profiles, and the resolver
//!
//! This crate adds the command layer used by the `droidconf` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;
pub mod logging;

// Re-export main components for library usage
pub use droidconf_build_engine as build;
pub use droidconf_core as core;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidconf_build_engine::{
        AbiTarget, BuildConfiguration, ConfigError, ConfigResolver, Declaration, ProfileRegistry,
        SigningProfileRegistry,
    };
    pub use droidconf_core::{SdkDefaults, Settings};
}
