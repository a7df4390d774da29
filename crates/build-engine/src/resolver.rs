//! Configuration Resolver
//!
//! Validates a [`Declaration`] and turns it into a [`BuildConfiguration`].
//!
//! # Checks performed
//!
//! 1. `applicationId` is present and in reverse-domain form (`namespace` too,
//!    when given).
//! 2. `minSdk`, `targetSdk`, `compileSdk` are positive and ordered
//!    `minSdk <= targetSdk <= compileSdk`.
//! 3. `abiFilters`, when present, is non-empty and names supported ABIs.
//! 4. Every `signingConfig` names a profile the registry knows.
//! 5. Remaining fields: build type names, `versionCode`, `versionName`,
//!    `noCompress`, `jvmTarget`, `ndkVersion`.
//!
//! Checks run in that order and stop at the first violation.

use std::collections::{BTreeMap, BTreeSet};

use droidconf_core::SdkDefaults;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::{
    AbiTarget, BuildConfiguration, BuildTypeConfig, DEFAULT_JVM_TARGET, SUPPORTED_JVM_TARGETS,
};
use crate::declaration::Declaration;
use crate::signing::SigningProfileRegistry;
use crate::ConfigError;

static APPLICATION_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$").expect("application id pattern")
});

static BUILD_TYPE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][A-Za-z0-9]*$").expect("build type pattern"));

static NDK_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(r\d+[a-z]?|\d+(\.\d+){0,2})$").expect("ndk version pattern"));

/// Highest `versionCode` the Play Store accepts
pub const MAX_VERSION_CODE: i64 = 2_100_000_000;

const DEFAULT_VERSION_CODE: u32 = 1;
const DEFAULT_VERSION_NAME: &str = "1.0";

/// Resolves declarations against a signing profile registry
pub struct ConfigResolver<'a> {
    registry: &'a dyn SigningProfileRegistry,
    sdk_defaults: SdkDefaults,
}

impl<'a> ConfigResolver<'a> {
    /// Create a resolver with no SDK fallbacks
    pub fn new(registry: &'a dyn SigningProfileRegistry) -> Self {
        Self {
            registry,
            sdk_defaults: SdkDefaults::none(),
        }
    }

    /// Use platform-provided SDK levels when a declaration omits them
    pub fn with_sdk_defaults(mut self, sdk_defaults: SdkDefaults) -> Self {
        self.sdk_defaults = sdk_defaults;
        self
    }

    /// Validate and normalize a declaration.
    ///
    /// # Errors
    ///
    /// Returns the first constraint violation found.
    pub fn resolve(&self, declaration: &Declaration) -> Result<BuildConfiguration, ConfigError> {
        let application_id = match declaration.application_id.as_deref() {
            Some(id) if !id.is_empty() => check_reverse_domain("applicationId", id)?,
            _ => return Err(ConfigError::missing("applicationId")),
        };
        let namespace = match declaration.namespace.as_deref() {
            Some(namespace) => check_reverse_domain("namespace", namespace)?,
            None => application_id.clone(),
        };

        let (min_sdk_version, target_sdk_version, compile_sdk_version) =
            self.resolve_sdk_levels(declaration)?;

        let abi_filters = resolve_abi_filters(declaration.abi_filters.as_deref())?;

        let signing_config_ref =
            self.check_signing("signingConfig", declaration.signing_config.as_deref())?;
        let mut build_types = BTreeMap::new();
        for (name, build_type) in &declaration.build_types {
            let field = format!("buildTypes.{}.signingConfig", name);
            let signing = self.check_signing(&field, build_type.signing_config.as_deref())?;
            build_types.insert(
                name.clone(),
                BuildTypeConfig {
                    signing_config_ref: signing,
                    minify_enabled: build_type.minify_enabled,
                },
            );
        }

        if let Some(name) = build_types.keys().find(|name| !BUILD_TYPE_NAME.is_match(name)) {
            return Err(ConfigError::invalid(
                &format!("buildTypes.{}", name),
                "a build type name starting with a lowercase letter, alphanumeric only",
            ));
        }

        let version_code = resolve_version_code(declaration.version_code)?;
        let version_name = match declaration.version_name.as_deref() {
            Some(name) if name.trim().is_empty() => {
                return Err(ConfigError::invalid("versionName", "a non-empty display string"))
            }
            Some(name) => name.to_string(),
            None => DEFAULT_VERSION_NAME.to_string(),
        };

        let no_compress_extensions = resolve_no_compress(declaration.no_compress.as_deref())?;
        let jvm_target = resolve_jvm_target(declaration.jvm_target)?;
        let ndk_version = match declaration.ndk_version.as_deref() {
            Some(version) if !NDK_VERSION.is_match(version) => {
                return Err(ConfigError::invalid(
                    "ndkVersion",
                    "an NDK release such as r26d or 26.1.10909125",
                ))
            }
            version => version.map(str::to_string),
        };

        debug!(
            "Resolved {} (sdk {}/{}/{})",
            application_id, min_sdk_version, target_sdk_version, compile_sdk_version
        );

        Ok(BuildConfiguration {
            application_id,
            namespace,
            min_sdk_version,
            target_sdk_version,
            compile_sdk_version,
            version_code,
            version_name,
            abi_filters,
            no_compress_extensions,
            signing_config_ref,
            ndk_version,
            jvm_target,
            build_types,
        })
    }

    fn resolve_sdk_levels(&self, declaration: &Declaration) -> Result<(u32, u32, u32), ConfigError> {
        let min = sdk_level("minSdk", declaration.min_sdk, None)?;
        let target = sdk_level("targetSdk", declaration.target_sdk, self.sdk_defaults.target_sdk)?;
        let compile = sdk_level("compileSdk", declaration.compile_sdk, self.sdk_defaults.compile_sdk)?;

        let field = if min > target {
            "minSdk"
        } else if target > compile {
            "targetSdk"
        } else {
            return Ok((min, target, compile));
        };

        Err(ConfigError::InvalidVersionOrdering {
            field: field.to_string(),
            min,
            target,
            compile,
        })
    }

    fn check_signing(&self, field: &str, name: Option<&str>) -> Result<Option<String>, ConfigError> {
        let Some(name) = name else {
            return Ok(None);
        };

        if name.trim().is_empty() {
            return Err(ConfigError::invalid(field, "a signing profile name"));
        }
        if !self.registry.contains(name) {
            return Err(ConfigError::UnknownSigningProfile {
                field: field.to_string(),
                name: name.to_string(),
            });
        }
        Ok(Some(name.to_string()))
    }
}

fn check_reverse_domain(field: &str, value: &str) -> Result<String, ConfigError> {
    if !APPLICATION_ID.is_match(value) {
        return Err(ConfigError::InvalidApplicationId {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

fn sdk_level(field: &str, declared: Option<i64>, fallback: Option<u32>) -> Result<u32, ConfigError> {
    let value = match (declared, fallback) {
        (Some(value), _) => value,
        (None, Some(value)) => i64::from(value),
        (None, None) => return Err(ConfigError::missing(field)),
    };

    u32::try_from(value)
        .ok()
        .filter(|level| *level > 0)
        .ok_or_else(|| ConfigError::invalid(field, "a positive integer"))
}

fn resolve_abi_filters(filters: Option<&[String]>) -> Result<Option<BTreeSet<AbiTarget>>, ConfigError> {
    let Some(filters) = filters else {
        return Ok(None);
    };

    if filters.is_empty() {
        return Err(ConfigError::EmptyAbiFilters);
    }

    filters
        .iter()
        .map(|abi| abi.parse::<AbiTarget>())
        .collect::<Result<BTreeSet<_>, _>>()
        .map(Some)
}

fn resolve_version_code(version_code: Option<i64>) -> Result<u32, ConfigError> {
    match version_code {
        None => Ok(DEFAULT_VERSION_CODE),
        Some(code) if (1..=MAX_VERSION_CODE).contains(&code) => Ok(code as u32),
        Some(_) => Err(ConfigError::invalid(
            "versionCode",
            format!("a positive integer no greater than {}", MAX_VERSION_CODE),
        )),
    }
}

fn resolve_no_compress(extensions: Option<&[String]>) -> Result<BTreeSet<String>, ConfigError> {
    let mut normalized = BTreeSet::new();
    for ext in extensions.unwrap_or_default() {
        let ext = ext.trim();
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
        if ext.is_empty() {
            return Err(ConfigError::invalid("noCompress", "non-empty file extensions"));
        }
        normalized.insert(ext);
    }
    Ok(normalized)
}

fn resolve_jvm_target(jvm_target: Option<i64>) -> Result<u32, ConfigError> {
    let Some(level) = jvm_target else {
        return Ok(DEFAULT_JVM_TARGET);
    };

    u32::try_from(level)
        .ok()
        .filter(|level| SUPPORTED_JVM_TARGETS.contains(level))
        .ok_or_else(|| ConfigError::invalid("jvmTarget", "one of 8, 11, 17, 21"))
}
