//! Tunable boundaries for apply-mode derivation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::directive::normalize_key;

/// Table attributes whose change forces a reopen by default.
pub const DEFAULT_STRUCTURAL_TABLE_ATTRIBUTES: &[&str] = &[
    "REGION_REPLICATION",
    "SPLIT_ENABLED",
    "MERGE_ENABLED",
    "SPLIT_POLICY",
];

/// Family attributes whose change forces a reopen by default.
pub const DEFAULT_STRUCTURAL_FAMILY_ATTRIBUTES: &[&str] = &[
    "BLOOMFILTER",
    "BLOCKSIZE",
    "BLOCKCACHE",
    "COMPRESSION",
    "COMPRESSION_COMPACT",
    "DATA_BLOCK_ENCODING",
    "ENCRYPTION",
    "IN_MEMORY",
    "IS_MOB",
    "MOB_THRESHOLD",
];

/// Which directives may accompany `lazy_mode` in the same call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LazyConflictPolicy {
    /// Reject only structural changes alongside lazy mode.
    #[default]
    StructuralOnly,
    /// Reject every other directive alongside lazy mode.
    RejectAll,
}

impl fmt::Display for LazyConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazyConflictPolicy::StructuralOnly => write!(f, "structural"),
            LazyConflictPolicy::RejectAll => write!(f, "reject-all"),
        }
    }
}

impl FromStr for LazyConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" | "structural-only" => Ok(LazyConflictPolicy::StructuralOnly),
            "reject-all" | "all" => Ok(LazyConflictPolicy::RejectAll),
            other => Err(format!("unknown lazy conflict policy: {}", other)),
        }
    }
}

/// Configuration for [`super::apply_directives`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutatorConfig {
    pub structural_table_attributes: BTreeSet<String>,
    pub structural_family_attributes: BTreeSet<String>,
    pub lazy_conflict_policy: LazyConflictPolicy,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            structural_table_attributes: DEFAULT_STRUCTURAL_TABLE_ATTRIBUTES
                .iter()
                .map(|key| key.to_string())
                .collect(),
            structural_family_attributes: DEFAULT_STRUCTURAL_FAMILY_ATTRIBUTES
                .iter()
                .map(|key| key.to_string())
                .collect(),
            lazy_conflict_policy: LazyConflictPolicy::default(),
        }
    }
}

impl MutatorConfig {
    /// Marks an additional table attribute as structural.
    pub fn with_structural_table_attribute(mut self, key: &str) -> Self {
        self.structural_table_attributes.insert(normalize_key(key));
        self
    }

    /// Marks an additional family attribute as structural.
    pub fn with_structural_family_attribute(mut self, key: &str) -> Self {
        self.structural_family_attributes.insert(normalize_key(key));
        self
    }

    pub fn with_lazy_conflict_policy(mut self, policy: LazyConflictPolicy) -> Self {
        self.lazy_conflict_policy = policy;
        self
    }

    /// Returns true if changing this (normalized) table attribute is structural.
    pub fn is_structural_table_attribute(&self, key: &str) -> bool {
        self.structural_table_attributes.contains(key)
    }

    /// Returns true if changing this (normalized) family attribute is structural.
    pub fn is_structural_family_attribute(&self, key: &str) -> bool {
        self.structural_family_attributes.contains(key)
    }
}
