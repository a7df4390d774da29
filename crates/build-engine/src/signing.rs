//! Signing Profiles
//!
//! Named signing profiles a declaration can refer to via `signingConfig`.
//! The resolver only asks whether a name is known; keystore contents are
//! left to the pipeline that signs the artifact.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

use droidconf_core::{KeyStoreType, SigningSettings};
use tracing::debug;

/// Name of the conventional debug profile
pub const DEBUG_PROFILE: &str = "debug";

/// Registry the resolver checks signing references against
pub trait SigningProfileRegistry {
    /// Whether a profile with this name is registered
    fn contains(&self, name: &str) -> bool;

    /// All registered profile names, sorted
    fn names(&self) -> Vec<String>;
}

/// Keystore information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStore {
    /// Path to keystore file
    pub path: PathBuf,
    /// Key alias
    pub alias: String,
    /// Keystore type (JKS, PKCS12)
    pub store_type: KeyStoreType,
}

impl KeyStore {
    /// Create a new keystore reference
    pub fn new(path: PathBuf, alias: &str) -> Self {
        Self {
            path,
            alias: alias.to_string(),
            store_type: KeyStoreType::Jks,
        }
    }
}

/// A named signing profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningProfile {
    pub name: String,
    pub keystore: KeyStore,
}

impl SigningProfile {
    pub fn new(name: &str, keystore: KeyStore) -> Self {
        Self {
            name: name.to_string(),
            keystore,
        }
    }

    /// The debug profile every Android SDK install provides
    pub fn debug() -> Self {
        Self::new(DEBUG_PROFILE, KeyStore::new(get_debug_keystore(), "androiddebugkey"))
    }
}

/// In-memory signing profile registry
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, SigningProfile>,
}

impl ProfileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding only the debug profile
    pub fn with_debug() -> Self {
        let mut registry = Self::new();
        registry.register(SigningProfile::debug());
        registry
    }

    /// Build a registry from the `[signing]` settings section
    pub fn from_settings(settings: &SigningSettings) -> Self {
        let mut registry = if settings.include_debug {
            Self::with_debug()
        } else {
            Self::new()
        };

        for entry in &settings.profiles {
            let keystore = KeyStore {
                path: entry.keystore.clone(),
                alias: entry.alias.clone(),
                store_type: entry.store_type,
            };
            registry.register(SigningProfile::new(&entry.name, keystore));
        }

        registry
    }

    /// Register a profile, returning the one it replaced
    pub fn register(&mut self, profile: SigningProfile) -> Option<SigningProfile> {
        debug!("Registering signing profile '{}'", profile.name);
        self.profiles.insert(profile.name.clone(), profile)
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&SigningProfile> {
        self.profiles.get(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl SigningProfileRegistry for ProfileRegistry {
    fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}

impl SigningProfileRegistry for BTreeSet<String> {
    fn contains(&self, name: &str) -> bool {
        BTreeSet::contains(self, name)
    }

    fn names(&self) -> Vec<String> {
        self.iter().cloned().collect()
    }
}

impl SigningProfileRegistry for HashSet<String> {
    fn contains(&self, name: &str) -> bool {
        HashSet::contains(self, name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.iter().cloned().collect();
        names.sort();
        names
    }
}

/// Get the debug keystore location
pub fn get_debug_keystore() -> PathBuf {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".android")
            .join("debug.keystore")
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".android")
            .join("debug.keystore")
    }
}
