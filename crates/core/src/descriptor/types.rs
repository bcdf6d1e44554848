use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::directive::{
    coprocessor_key, normalize_key, AttributeMap, ColumnFamilySpec, ConfigScope,
    ConfigurationOverrides, CoprocessorSpec, TableAttributeSet,
};

use super::error::{MutationError, Result};

/// Full schema of a table.
///
/// Callers treat a descriptor as an immutable value: the mutator works on a
/// clone and returns a new descriptor inside a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub(super) name: String,
    #[serde(default)]
    pub(super) families: BTreeMap<String, ColumnFamilySpec>,
    #[serde(default)]
    pub(super) attributes: TableAttributeSet,
    #[serde(default)]
    pub(super) metadata: AttributeMap,
    #[serde(default)]
    pub(super) coprocessors: BTreeMap<u32, CoprocessorSpec>,
    /// Highest coprocessor sequence number ever assigned.
    #[serde(default)]
    pub(super) coprocessor_high_water: u32,
    #[serde(default)]
    pub(super) configuration: ConfigurationOverrides,
}

impl TableDescriptor {
    /// Creates an empty descriptor for the given table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            families: BTreeMap::new(),
            attributes: TableAttributeSet::new(),
            metadata: AttributeMap::new(),
            coprocessors: BTreeMap::new(),
            coprocessor_high_water: 0,
            configuration: ConfigurationOverrides::new(),
        }
    }

    /// Adds (or replaces) a column family.
    pub fn with_family(mut self, family: ColumnFamilySpec) -> Self {
        self.families.insert(family.name.clone(), family);
        self
    }

    /// Sets a table attribute, normalizing its key.
    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(normalize_key(key), value.into());
        self
    }

    /// Sets a free-form metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Registers a coprocessor under the next sequence number.
    pub fn with_coprocessor(mut self, coprocessor: CoprocessorSpec) -> Result<Self> {
        self.insert_coprocessor(coprocessor)?;
        Ok(self)
    }

    /// Sets a table-scope configuration override.
    pub fn with_configuration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn families(&self) -> &BTreeMap<String, ColumnFamilySpec> {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&ColumnFamilySpec> {
        self.families.get(name)
    }

    pub fn has_family(&self, name: &str) -> bool {
        self.families.contains_key(name)
    }

    pub fn attributes(&self) -> &TableAttributeSet {
        &self.attributes
    }

    /// Looks up a table attribute by (case-insensitive) key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn metadata(&self) -> &AttributeMap {
        &self.metadata
    }

    /// Coprocessors keyed by sequence number.
    pub fn coprocessors(&self) -> &BTreeMap<u32, CoprocessorSpec> {
        &self.coprocessors
    }

    /// Coprocessors as `coprocessor$N` attribute entries.
    pub fn coprocessor_attributes(&self) -> Vec<(String, String)> {
        self.coprocessors
            .iter()
            .map(|(sequence, spec)| (coprocessor_key(*sequence), spec.to_attribute_value()))
            .collect()
    }

    /// Sequence number the next coprocessor will receive, or `None` once the
    /// sequence space is used up.
    pub fn next_coprocessor_sequence(&self) -> Option<u32> {
        let max_existing = self.coprocessors.keys().next_back().copied().unwrap_or(0);
        self.coprocessor_high_water.max(max_existing).checked_add(1)
    }

    /// Table-scope configuration overrides.
    pub fn configuration(&self) -> &ConfigurationOverrides {
        &self.configuration
    }

    /// Configuration overrides for a scope, if the scope exists.
    pub fn scoped_configuration(&self, scope: &ConfigScope) -> Option<&ConfigurationOverrides> {
        match scope {
            ConfigScope::Table => Some(&self.configuration),
            ConfigScope::Family(name) => self.families.get(name).map(|family| &family.configuration),
        }
    }

    pub(super) fn insert_coprocessor(&mut self, coprocessor: CoprocessorSpec) -> Result<u32> {
        let sequence = self.next_coprocessor_sequence().ok_or_else(|| {
            MutationError::CoprocessorSequenceExhausted {
                table: self.name.clone(),
            }
        })?;
        self.coprocessors.insert(sequence, coprocessor);
        self.coprocessor_high_water = sequence;
        Ok(sequence)
    }
}

/// How urgently a change-set must be propagated to serving nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Metadata-only; takes effect without reopening anything.
    Immediate,
    /// Structural; serving nodes must reopen the table's regions.
    RequiresReopen,
    /// Applied as nodes naturally reload.
    Lazy,
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyMode::Immediate => write!(f, "immediate"),
            ApplyMode::RequiresReopen => write!(f, "requires_reopen"),
            ApplyMode::Lazy => write!(f, "lazy"),
        }
    }
}

/// Configuration attached through lazy mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredConfiguration {
    pub scope: ConfigScope,
    pub overrides: ConfigurationOverrides,
}

/// Result of applying a batch of directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub descriptor: TableDescriptor,
    pub apply_mode: ApplyMode,
    /// Non-fatal problems (e.g. a coprocessor class that matched nothing).
    pub warnings: Vec<MutationError>,
    /// Structural changes that forced [`ApplyMode::RequiresReopen`].
    pub reopen_reasons: Vec<String>,
    pub deferred: Vec<DeferredConfiguration>,
}

impl ChangeSet {
    /// Returns true if the new descriptor differs from `previous`.
    pub fn changes(&self, previous: &TableDescriptor) -> bool {
        self.descriptor != *previous
    }
}
