//! Android Build Engine
//!
//! Loads build declarations, validates them, and resolves them into the
//! normalized configuration an external build pipeline consumes.

pub mod config;
pub mod declaration;
pub mod resolver;
pub mod signing;

pub use config::{AbiTarget, BuildConfiguration, BuildTypeConfig};
pub use declaration::{BuildTypeDeclaration, Declaration, DeclarationError, DeclarationFormat};
pub use resolver::ConfigResolver;
pub use signing::{KeyStore, ProfileRegistry, SigningProfile, SigningProfileRegistry};

/// Resolution errors.
///
/// Every variant names the offending field and the constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing field '{field}'")]
    MissingField { field: String },
    #[error("Invalid application id '{value}' in '{field}': expected lowercase reverse-domain segments such as com.example.app")]
    InvalidApplicationId { field: String, value: String },
    #[error("Invalid value for '{field}': expected {expected}")]
    InvalidField { field: String, expected: String },
    #[error("Invalid SDK ordering at '{field}': expected minSdk ({min}) <= targetSdk ({target}) <= compileSdk ({compile})")]
    InvalidVersionOrdering {
        field: String,
        min: u32,
        target: u32,
        compile: u32,
    },
    #[error("Empty 'abiFilters': expected at least one of arm64-v8a, armeabi-v7a, x86, x86_64")]
    EmptyAbiFilters,
    #[error("Unsupported ABI '{abi}' in 'abiFilters': expected one of arm64-v8a, armeabi-v7a, x86, x86_64")]
    UnsupportedAbi { abi: String },
    #[error("Unknown signing profile '{name}' in '{field}'")]
    UnknownSigningProfile { field: String, name: String },
}

impl ConfigError {
    /// Declaration key that caused the error
    pub fn field(&self) -> &str {
        match self {
            ConfigError::MissingField { field }
            | ConfigError::InvalidApplicationId { field, .. }
            | ConfigError::InvalidField { field, .. }
            | ConfigError::InvalidVersionOrdering { field, .. }
            | ConfigError::UnknownSigningProfile { field, .. } => field,
            ConfigError::EmptyAbiFilters | ConfigError::UnsupportedAbi { .. } => "abiFilters",
        }
    }

    /// Resolution errors come from static input; retrying never helps
    pub fn is_recoverable(&self) -> bool {
        false
    }

    pub(crate) fn missing(field: &str) -> Self {
        ConfigError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, expected: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field: field.to_string(),
            expected: expected.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_names() {
        assert_eq!(ConfigError::missing("applicationId").field(), "applicationId");
        assert_eq!(ConfigError::EmptyAbiFilters.field(), "abiFilters");
        assert_eq!(
            ConfigError::UnsupportedAbi { abi: "mips".into() }.field(),
            "abiFilters"
        );
    }

    #[test]
    fn test_error_messages_name_constraint() {
        let err = ConfigError::invalid("versionCode", "a positive integer");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'versionCode': expected a positive integer"
        );
        assert!(!err.is_recoverable());
    }
}
