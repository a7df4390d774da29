//! CLI commands for droidconf
//!
//! Each command returns its output as a string so the binary decides where
//! it goes.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use droidconf_build_engine::{
    AbiTarget, BuildConfiguration, ConfigResolver, Declaration, ProfileRegistry,
    SigningProfileRegistry,
};
use droidconf_core::Settings;

/// Output format for resolved configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// TOML
    Toml,
}

/// Load a declaration file and resolve it with the given settings
pub async fn resolve_file(path: &Path, settings: &Settings) -> Result<BuildConfiguration> {
    let declaration = Declaration::load(path)
        .await
        .with_context(|| format!("Failed to load declaration {}", path.display()))?;

    let registry = ProfileRegistry::from_settings(&settings.signing);
    let config = ConfigResolver::new(&registry)
        .with_sdk_defaults(settings.sdk)
        .resolve(&declaration)
        .with_context(|| format!("Invalid build configuration in {}", path.display()))?;

    Ok(config)
}

/// Resolve command options
pub struct ResolveCommand {
    /// Declaration file
    pub declaration: PathBuf,
    /// Output format
    pub format: OutputFormat,
}

impl ResolveCommand {
    /// Resolve the declaration and render the normalized record
    pub async fn execute(&self, settings: &Settings) -> Result<String> {
        let config = resolve_file(&self.declaration, settings).await?;
        info!("Resolved {}", config.application_id());

        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config)?,
            OutputFormat::Toml => toml::to_string_pretty(&config)?,
        };
        Ok(rendered)
    }
}

/// Check command options
pub struct CheckCommand {
    /// Declaration file
    pub declaration: PathBuf,
}

impl CheckCommand {
    /// Validate the declaration and summarize it
    pub async fn execute(&self, settings: &Settings) -> Result<String> {
        let config = resolve_file(&self.declaration, settings).await?;

        let abis: Vec<&str> = config.effective_abis().iter().map(AbiTarget::as_str).collect();
        Ok(format!(
            "{}: ok ({} v{} [{}], sdk {}/{}/{}, abis: {})",
            self.declaration.display(),
            config.application_id(),
            config.version_name(),
            config.version_code(),
            config.min_sdk_version(),
            config.target_sdk_version(),
            config.compile_sdk_version(),
            abis.join(", ")
        ))
    }
}

/// Supported ABI listing
pub struct AbisCommand;

impl AbisCommand {
    /// List supported ABIs with their Rust target triples
    pub fn execute(&self) -> String {
        let mut out = String::new();
        for abi in AbiTarget::all_targets() {
            let _ = writeln!(out, "{:<12} {}", abi.as_str(), abi.rust_triple());
        }
        out
    }
}

/// Signing profile listing
pub struct ProfilesCommand;

impl ProfilesCommand {
    /// List the signing profiles known to the registry
    pub fn execute(&self, settings: &Settings) -> String {
        let registry = ProfileRegistry::from_settings(&settings.signing);
        if registry.is_empty() {
            return "No signing profiles configured.\n".to_string();
        }

        let mut out = String::new();
        for name in registry.names() {
            if let Some(profile) = registry.get(&name) {
                let _ = writeln!(
                    out,
                    "{:<12} {} ({}, alias {})",
                    profile.name,
                    profile.keystore.path.display(),
                    profile.keystore.store_type.as_str(),
                    profile.keystore.alias
                );
            }
        }
        out
    }
}
