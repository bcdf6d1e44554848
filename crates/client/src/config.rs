use std::env;
use std::path::PathBuf;

use tablealter_core::descriptor::{LazyConflictPolicy, MutatorConfig};

/// Default location of the JSON descriptor store.
pub const DEFAULT_STORE_PATH: &str = "tablealter.json";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the JSON descriptor store (default: "tablealter.json")
    pub store_path: PathBuf,
    /// Which directives may accompany lazy mode (default: structural)
    pub lazy_policy: LazyConflictPolicy,
    /// Extra table attributes treated as structural
    pub structural_attributes: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLEALTER_STORE` - JSON store path (default: "tablealter.json")
    /// - `TABLEALTER_LAZY_POLICY` - `structural` or `reject-all` (default: structural)
    /// - `TABLEALTER_STRUCTURAL_ATTRIBUTES` - comma-separated table attributes
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            store_path: lookup("TABLEALTER_STORE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            lazy_policy: lookup("TABLEALTER_LAZY_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            structural_attributes: lookup("TABLEALTER_STRUCTURAL_ATTRIBUTES")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|key| !key.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Builds the mutator configuration for this client.
    pub fn mutator_config(&self) -> MutatorConfig {
        self.structural_attributes.iter().fold(
            MutatorConfig::default().with_lazy_conflict_policy(self.lazy_policy),
            |config, key| config.with_structural_table_attribute(key),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
