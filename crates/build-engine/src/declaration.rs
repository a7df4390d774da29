//! Build Declarations
//!
//! The raw, unvalidated form of a build configuration as written in a
//! declaration file. Values are kept loose (signed integers, plain strings)
//! so the resolver can report constraint violations by field name instead
//! of failing inside the deserializer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Declaration loading errors
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported declaration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Declaration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Toml,
    Json,
    Yaml,
}

impl DeclarationFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(DeclarationFormat::Toml),
            "json" => Some(DeclarationFormat::Json),
            "yaml" | "yml" => Some(DeclarationFormat::Yaml),
            _ => None,
        }
    }
}

/// A `buildTypes.<name>` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildTypeDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,
    #[serde(default)]
    pub minify_enabled: bool,
}

/// Raw build declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Declaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sdk: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_sdk: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi_filters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_compress: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub build_types: BTreeMap<String, BuildTypeDeclaration>,
}

impl Declaration {
    pub fn from_toml_str(s: &str) -> Result<Self, DeclarationError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, DeclarationError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, DeclarationError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parse a declaration in the given format
    pub fn parse(s: &str, format: DeclarationFormat) -> Result<Self, DeclarationError> {
        match format {
            DeclarationFormat::Toml => Self::from_toml_str(s),
            DeclarationFormat::Json => Self::from_json_str(s),
            DeclarationFormat::Yaml => Self::from_yaml_str(s),
        }
    }

    /// Load a declaration file, choosing the format by extension
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DeclarationError> {
        let path = path.as_ref();
        let format = DeclarationFormat::from_path(path)
            .ok_or_else(|| DeclarationError::UnsupportedFormat(path.to_path_buf()))?;

        debug!("Loading {:?} declaration from {:?}", format, path);
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content, format)
    }
}
