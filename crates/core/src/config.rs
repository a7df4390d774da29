//! Settings
//!
//! User-level settings for droidconf:
//! - SDK defaults used when a declaration leaves them out
//! - Signing profiles known to the registry
//! - Preferred log level

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SettingsError};

/// SDK levels supplied by the platform when a declaration omits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkDefaults {
    /// Fallback compile SDK version
    pub compile_sdk: Option<u32>,
    /// Fallback target SDK version
    pub target_sdk: Option<u32>,
}

impl Default for SdkDefaults {
    fn default() -> Self {
        Self {
            compile_sdk: Some(34),
            target_sdk: Some(34),
        }
    }
}

impl SdkDefaults {
    /// No fallbacks; every SDK level must be declared
    pub fn none() -> Self {
        Self {
            compile_sdk: None,
            target_sdk: None,
        }
    }
}

/// Keystore type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStoreType {
    #[default]
    Jks,
    Pkcs12,
}

impl KeyStoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStoreType::Jks => "JKS",
            KeyStoreType::Pkcs12 => "PKCS12",
        }
    }
}

/// One `[[signing.profiles]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Name referenced by `signingConfig` in declarations
    pub name: String,
    /// Keystore file
    pub keystore: PathBuf,
    /// Key alias inside the keystore
    pub alias: String,
    /// Keystore format
    #[serde(default)]
    pub store_type: KeyStoreType,
}

/// Signing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningSettings {
    /// Register the conventional `debug` profile
    pub include_debug: bool,
    /// User-declared profiles
    pub profiles: Vec<ProfileEntry>,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            include_debug: true,
            profiles: Vec::new(),
        }
    }
}

/// Main settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: Option<String>,
    /// SDK fallbacks
    pub sdk: SdkDefaults,
    /// Signing profiles
    pub signing: SigningSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: None,
            sdk: SdkDefaults::default(),
            signing: SigningSettings::default(),
        }
    }
}

impl Settings {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "droidconf", "droidconf")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load settings from the default location.
    ///
    /// A missing file, or no resolvable config directory, yields defaults;
    /// nothing is written.
    pub async fn load() -> Result<Self> {
        match Self::config_file() {
            Some(config_file) if config_file.exists() => Self::load_from(&config_file).await,
            _ => {
                info!("Settings file not found, using defaults");
                Ok(Settings::default())
            }
        }
    }

    /// Load settings from an explicit path
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading settings from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        Self::parse(&contents)
    }

    /// Parse settings from a TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents)?;
        settings.check_profiles()?;
        Ok(settings)
    }

    /// Save settings to an explicit path
    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Settings saved to {:?}", path);
        Ok(())
    }

    fn check_profiles(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for profile in &self.signing.profiles {
            if !seen.insert(profile.name.as_str()) {
                return Err(SettingsError::DuplicateProfile {
                    name: profile.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.sdk.compile_sdk, Some(34));
        assert_eq!(settings.sdk.target_sdk, Some(34));
        assert!(settings.signing.include_debug);
        assert!(settings.signing.profiles.is_empty());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings = Settings::parse(
            r#"
            log_level = "debug"

            [sdk]
            compile_sdk = 35

            [[signing.profiles]]
            name = "upload"
            keystore = "/keys/upload.p12"
            alias = "upload"
            store_type = "pkcs12"
            "#,
        )
        .unwrap();

        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.sdk.compile_sdk, Some(35));
        assert_eq!(settings.sdk.target_sdk, Some(34));
        assert!(settings.signing.include_debug);
        assert_eq!(settings.signing.profiles[0].store_type, KeyStoreType::Pkcs12);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = Settings::parse("sdk = 3").unwrap_err();
        assert!(matches!(err, SettingsError::TomlParse(_)));
    }

    #[test]
    fn test_parse_rejects_duplicate_profiles() {
        let err = Settings::parse(
            r#"
            [[signing.profiles]]
            name = "release"
            keystore = "a.jks"
            alias = "a"

            [[signing.profiles]]
            name = "release"
            keystore = "b.jks"
            alias = "b"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, SettingsError::DuplicateProfile { ref name } if name == "release"));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.signing.profiles.push(ProfileEntry {
            name: "release".into(),
            keystore: PathBuf::from("/keys/release.jks"),
            alias: "release".into(),
            store_type: KeyStoreType::Jks,
        });
        settings.save_to(&path).await.unwrap();

        let loaded = Settings::load_from(&path).await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_duplicate_profiles_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
            [[signing.profiles]]
            name = "release"
            keystore = "a.jks"
            alias = "a"

            [[signing.profiles]]
            name = "release"
            keystore = "b.jks"
            alias = "b"
            "#,
        )
        .await
        .unwrap();

        let err = Settings::load_from(&path).await.unwrap_err();
        assert!(matches!(err, SettingsError::DuplicateProfile { ref name } if name == "release"));
    }
}
