//! Build Configuration
//!
//! The normalized record handed to the external build pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ConfigError;

/// Target ABI for build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AbiTarget {
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl AbiTarget {
    /// Android ABI identifier as written in `abiFilters`
    pub fn as_str(&self) -> &'static str {
        match self {
            AbiTarget::Arm64V8a => "arm64-v8a",
            AbiTarget::ArmeabiV7a => "armeabi-v7a",
            AbiTarget::X86 => "x86",
            AbiTarget::X86_64 => "x86_64",
        }
    }

    /// Rust target triple for this ABI
    pub fn rust_triple(&self) -> &'static str {
        match self {
            AbiTarget::Arm64V8a => "aarch64-linux-android",
            AbiTarget::ArmeabiV7a => "armv7-linux-androideabi",
            AbiTarget::X86 => "i686-linux-android",
            AbiTarget::X86_64 => "x86_64-linux-android",
        }
    }

    /// Every supported ABI, in output order
    pub fn all_targets() -> &'static [AbiTarget] {
        &[
            AbiTarget::Arm64V8a,
            AbiTarget::ArmeabiV7a,
            AbiTarget::X86,
            AbiTarget::X86_64,
        ]
    }
}

impl FromStr for AbiTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AbiTarget::all_targets()
            .iter()
            .copied()
            .find(|abi| abi.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedAbi { abi: s.to_string() })
    }
}

impl fmt::Display for AbiTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Java language levels accepted for `jvmTarget`
pub const SUPPORTED_JVM_TARGETS: &[u32] = &[8, 11, 17, 21];

/// Java level used when the declaration does not set one
pub const DEFAULT_JVM_TARGET: u32 = 17;

/// Resolved build type (debug, release, ...)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTypeConfig {
    /// Signing profile declared on the build type itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_config_ref: Option<String>,
    /// Run code shrinking for this build type
    pub minify_enabled: bool,
}

/// Normalized build configuration.
///
/// Only [`crate::ConfigResolver`] can construct one, and it exposes no
/// mutators, so a value is always the validated output of a single
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    pub(crate) application_id: String,
    pub(crate) namespace: String,
    pub(crate) min_sdk_version: u32,
    pub(crate) target_sdk_version: u32,
    pub(crate) compile_sdk_version: u32,
    pub(crate) version_code: u32,
    pub(crate) version_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) abi_filters: Option<BTreeSet<AbiTarget>>,
    pub(crate) no_compress_extensions: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) signing_config_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ndk_version: Option<String>,
    pub(crate) jvm_target: u32,
    pub(crate) build_types: BTreeMap<String, BuildTypeConfig>,
}

impl BuildConfiguration {
    /// Package name the app is installed under
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Code namespace; the application id unless declared
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Lowest supported API level
    pub fn min_sdk_version(&self) -> u32 {
        self.min_sdk_version
    }

    /// API level the app is tested against
    pub fn target_sdk_version(&self) -> u32 {
        self.target_sdk_version
    }

    /// API level compiled against
    pub fn compile_sdk_version(&self) -> u32 {
        self.compile_sdk_version
    }

    /// Internal version number
    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    /// Version shown to users
    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    /// Declared ABI filters; `None` when the declaration has no `abiFilters`
    pub fn abi_filters(&self) -> Option<&BTreeSet<AbiTarget>> {
        self.abi_filters.as_ref()
    }

    /// ABIs the pipeline should build: the filters, or every supported ABI
    pub fn effective_abis(&self) -> Vec<AbiTarget> {
        match &self.abi_filters {
            Some(filters) => filters.iter().copied().collect(),
            None => AbiTarget::all_targets().to_vec(),
        }
    }

    /// Rust target triples for [`Self::effective_abis`]
    pub fn rust_targets(&self) -> Vec<&'static str> {
        self.effective_abis().iter().map(AbiTarget::rust_triple).collect()
    }

    /// Extensions stored uncompressed, lowercase and without a leading dot
    pub fn no_compress_extensions(&self) -> &BTreeSet<String> {
        &self.no_compress_extensions
    }

    /// Whether an asset path should be stored uncompressed
    pub fn is_no_compress(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.no_compress_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)))
    }

    /// Top-level signing profile name
    pub fn signing_config_ref(&self) -> Option<&str> {
        self.signing_config_ref.as_deref()
    }

    /// Pinned NDK version, if any
    pub fn ndk_version(&self) -> Option<&str> {
        self.ndk_version.as_deref()
    }

    /// Java language level
    pub fn jvm_target(&self) -> u32 {
        self.jvm_target
    }

    /// Resolved build types by name
    pub fn build_types(&self) -> &BTreeMap<String, BuildTypeConfig> {
        &self.build_types
    }

    /// Signing profile for a build type, falling back to the top-level one
    pub fn signing_config_for(&self, build_type: &str) -> Option<&str> {
        self.build_types
            .get(build_type)
            .and_then(|bt| bt.signing_config_ref.as_deref())
            .or(self.signing_config_ref.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BuildConfiguration {
        let mut build_types = BTreeMap::new();
        build_types.insert(
            "release".to_string(),
            BuildTypeConfig {
                signing_config_ref: Some("upload".into()),
                minify_enabled: true,
            },
        );
        build_types.insert("debug".to_string(), BuildTypeConfig::default());

        BuildConfiguration {
            application_id: "com.example.app".into(),
            namespace: "com.example.app".into(),
            min_sdk_version: 26,
            target_sdk_version: 34,
            compile_sdk_version: 34,
            version_code: 1,
            version_name: "1.0".into(),
            abi_filters: None,
            no_compress_extensions: ["tflite".to_string()].into_iter().collect(),
            signing_config_ref: Some("debug".into()),
            ndk_version: None,
            jvm_target: DEFAULT_JVM_TARGET,
            build_types,
        }
    }

    #[test]
    fn test_abi_parse() {
        assert_eq!(" x86_64 ".parse::<AbiTarget>().unwrap(), AbiTarget::X86_64);
        assert_eq!("arm64-v8a".parse::<AbiTarget>().unwrap(), AbiTarget::Arm64V8a);

        let err = "mips128".parse::<AbiTarget>().unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedAbi { abi: "mips128".into() });
    }

    #[test]
    fn test_effective_abis_without_filters() {
        let config = sample();
        assert_eq!(config.effective_abis().len(), 4);
        assert!(config.rust_targets().contains(&"aarch64-linux-android"));
    }

    #[test]
    fn test_signing_config_for_build_type() {
        let config = sample();
        assert_eq!(config.signing_config_for("release"), Some("upload"));
        assert_eq!(config.signing_config_for("debug"), Some("debug"));
        assert_eq!(config.signing_config_for("staging"), Some("debug"));
    }

    #[test]
    fn test_no_compress_matching() {
        let config = sample();
        assert!(config.is_no_compress("assets/model.TFLITE"));
        assert!(!config.is_no_compress("assets/tflite.json"));
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["applicationId"], "com.example.app");
        assert_eq!(json["minSdkVersion"], 26);
        assert_eq!(json["noCompressExtensions"][0], "tflite");
        assert_eq!(json["buildTypes"]["release"]["signingConfigRef"], "upload");
        assert!(json.get("abiFilters").is_none());
    }
}
