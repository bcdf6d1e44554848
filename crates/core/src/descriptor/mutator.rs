//! Applies parsed directives to a table descriptor.
//!
//! The mutator never touches the caller's descriptor: it works on a clone and
//! either returns the finished [`ChangeSet`] or the first fatal error.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::directive::{
    normalize_key, parse_coprocessor_key, AttributeMap, ColumnFamilySpec, ConfigScope,
    ConfigurationOverrides, CoprocessorSpec, Directive, TableAttributeSet,
};

use super::config::{LazyConflictPolicy, MutatorConfig};
use super::error::{MutationError, Result};
use super::types::{ApplyMode, ChangeSet, DeferredConfiguration, TableDescriptor};

/// Applies `directives` in order to a working copy of `current`.
///
/// # Examples
///
/// ```
/// use tablealter_core::descriptor::{apply_directives, ApplyMode, MutatorConfig, TableDescriptor};
/// use tablealter_core::directive::Directive;
///
/// let current = TableDescriptor::new("t1");
/// let directives = vec![Directive::SetTableAttributes(
///     [("MAX_FILESIZE".to_string(), "1024".to_string())].into(),
/// )];
///
/// let change_set = apply_directives(&current, &directives, &MutatorConfig::default()).unwrap();
/// assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
/// assert_eq!(change_set.descriptor.attribute("MAX_FILESIZE"), Some("1024"));
/// assert_eq!(current.attribute("MAX_FILESIZE"), None);
/// ```
pub fn apply_directives(
    current: &TableDescriptor,
    directives: &[Directive],
    config: &MutatorConfig,
) -> Result<ChangeSet> {
    let mut mutation = Mutation::new(current, config);

    for directive in directives {
        trace!(table = %current.name(), directive = directive.kind(), "Applying directive");
        mutation.apply(directive)?;
    }

    mutation.finish()
}

struct Mutation<'a> {
    config: &'a MutatorConfig,
    descriptor: TableDescriptor,
    warnings: Vec<MutationError>,
    reopen_reasons: Vec<String>,
    deferred: Vec<DeferredConfiguration>,
    non_lazy: Vec<&'static str>,
}

impl<'a> Mutation<'a> {
    fn new(current: &TableDescriptor, config: &'a MutatorConfig) -> Self {
        Self {
            config,
            descriptor: current.clone(),
            warnings: Vec::new(),
            reopen_reasons: Vec::new(),
            deferred: Vec::new(),
            non_lazy: Vec::new(),
        }
    }

    fn apply(&mut self, directive: &Directive) -> Result<()> {
        if !directive.is_lazy() {
            self.non_lazy.push(directive.kind());
        }

        match directive {
            Directive::AddOrModifyFamily(family) => {
                self.add_or_modify_family(family);
                Ok(())
            }
            Directive::DeleteFamily(name) => self.delete_family(name),
            Directive::SetTableAttributes(attributes) => {
                self.set_table_attributes(attributes);
                Ok(())
            }
            Directive::SetMetadata(metadata) => {
                self.set_metadata(metadata);
                Ok(())
            }
            Directive::UnsetTableAttribute(name) => self.unset_table_attribute(name),
            Directive::AddCoprocessor(spec) => self.add_coprocessor(spec),
            Directive::RemoveCoprocessorByClass(classnames) => {
                self.remove_coprocessors(classnames);
                Ok(())
            }
            Directive::SetConfiguration(scope, overrides) => {
                self.set_configuration(scope, overrides)
            }
            Directive::UnsetConfiguration(scope, key) => self.unset_configuration(scope, key),
            Directive::EnterLazyMode { scope, overrides } => self.enter_lazy_mode(scope, overrides),
        }
    }

    fn add_or_modify_family(&mut self, family: &ColumnFamilySpec) {
        match self.descriptor.families.get_mut(&family.name) {
            Some(existing) => {
                let mut structural = Vec::new();
                for (key, value) in &family.attributes {
                    let previous = existing.attributes.insert(key.clone(), value.clone());
                    if previous.as_deref() != Some(value.as_str())
                        && self.config.is_structural_family_attribute(key)
                    {
                        structural.push(key.clone());
                    }
                }
                existing.configuration.extend(
                    family
                        .configuration
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone())),
                );
                for key in structural {
                    self.reopen(format!("modified family '{}' attribute {}", family.name, key));
                }
            }
            None => {
                self.descriptor
                    .families
                    .insert(family.name.clone(), family.clone());
                self.reopen(format!("added family '{}'", family.name));
            }
        }
    }

    fn delete_family(&mut self, name: &str) -> Result<()> {
        if self.descriptor.families.remove(name).is_none() {
            return Err(MutationError::FamilyNotFound {
                family: name.to_string(),
            });
        }
        self.reopen(format!("deleted family '{}'", name));
        Ok(())
    }

    fn set_table_attributes(&mut self, attributes: &TableAttributeSet) {
        for (key, value) in attributes {
            let key = normalize_key(key);
            let previous = self.descriptor.attributes.insert(key.clone(), value.clone());
            if previous.as_deref() != Some(value.as_str())
                && self.config.is_structural_table_attribute(&key)
            {
                self.reopen(format!("changed table attribute {}", key));
            }
        }
    }

    fn set_metadata(&mut self, metadata: &AttributeMap) {
        self.descriptor.metadata.extend(
            metadata
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    /// Attribute first, then metadata, then a `coprocessor$N` entry.
    fn unset_table_attribute(&mut self, name: &str) -> Result<()> {
        let key = normalize_key(name);
        if self.descriptor.attributes.remove(&key).is_some() {
            if self.config.is_structural_table_attribute(&key) {
                self.reopen(format!("removed table attribute {}", key));
            }
            return Ok(());
        }

        if self.descriptor.metadata.remove(name).is_some() {
            return Ok(());
        }

        if let Some(sequence) = parse_coprocessor_key(name) {
            if self.descriptor.coprocessors.remove(&sequence).is_some() {
                return Ok(());
            }
        }

        Err(MutationError::AttributeNotFound {
            attribute: name.to_string(),
        })
    }

    fn add_coprocessor(&mut self, spec: &CoprocessorSpec) -> Result<()> {
        let sequence = self.descriptor.insert_coprocessor(spec.clone())?;
        debug!(
            table = %self.descriptor.name(),
            classname = %spec.classname,
            sequence,
            "Registered coprocessor"
        );
        Ok(())
    }

    /// A classname listed twice is matched once.
    fn remove_coprocessors(&mut self, classnames: &[String]) {
        let mut seen = BTreeSet::new();
        for classname in classnames.iter().filter(|name| seen.insert(name.as_str())) {
            let before = self.descriptor.coprocessors.len();
            self.descriptor
                .coprocessors
                .retain(|_, spec| spec.classname != *classname);

            if self.descriptor.coprocessors.len() == before {
                debug!(table = %self.descriptor.name(), classname = %classname, "No coprocessor matched");
                self.warnings.push(MutationError::CoprocessorNotFound {
                    classname: classname.clone(),
                });
            }
        }
    }

    fn set_configuration(
        &mut self,
        scope: &ConfigScope,
        overrides: &ConfigurationOverrides,
    ) -> Result<()> {
        let target = self.scoped_configuration_mut(scope)?;
        target.extend(
            overrides
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Ok(())
    }

    fn unset_configuration(&mut self, scope: &ConfigScope, key: &str) -> Result<()> {
        let target = self.scoped_configuration_mut(scope)?;
        match target.remove(key) {
            Some(_) => Ok(()),
            None => Err(MutationError::ConfigKeyNotFound {
                scope: scope.clone(),
                key: key.to_string(),
            }),
        }
    }

    fn enter_lazy_mode(
        &mut self,
        scope: &ConfigScope,
        overrides: &ConfigurationOverrides,
    ) -> Result<()> {
        self.set_configuration(scope, overrides)?;
        self.deferred.push(DeferredConfiguration {
            scope: scope.clone(),
            overrides: overrides.clone(),
        });
        Ok(())
    }

    fn scoped_configuration_mut(
        &mut self,
        scope: &ConfigScope,
    ) -> Result<&mut ConfigurationOverrides> {
        match scope {
            ConfigScope::Table => Ok(&mut self.descriptor.configuration),
            ConfigScope::Family(name) => self
                .descriptor
                .families
                .get_mut(name)
                .map(|family| &mut family.configuration)
                .ok_or_else(|| MutationError::FamilyNotFound {
                    family: name.clone(),
                }),
        }
    }

    fn reopen(&mut self, reason: String) {
        trace!(table = %self.descriptor.name(), reason = %reason, "Structural change");
        self.reopen_reasons.push(reason);
    }

    fn finish(self) -> Result<ChangeSet> {
        let lazy = !self.deferred.is_empty();

        if lazy {
            match self.config.lazy_conflict_policy {
                LazyConflictPolicy::StructuralOnly if !self.reopen_reasons.is_empty() => {
                    return Err(MutationError::IncompatibleDirectives {
                        reason: format!(
                            "lazy_mode cannot be combined with structural changes ({})",
                            self.reopen_reasons.join(", ")
                        ),
                    });
                }
                LazyConflictPolicy::RejectAll if !self.non_lazy.is_empty() => {
                    return Err(MutationError::IncompatibleDirectives {
                        reason: format!(
                            "lazy_mode cannot be combined with other directives ({})",
                            self.non_lazy.join(", ")
                        ),
                    });
                }
                _ => {}
            }
        }

        let apply_mode = if lazy {
            ApplyMode::Lazy
        } else if self.reopen_reasons.is_empty() {
            ApplyMode::Immediate
        } else {
            ApplyMode::RequiresReopen
        };

        debug!(
            table = %self.descriptor.name(),
            mode = %apply_mode,
            warnings = self.warnings.len(),
            "Directives applied"
        );

        Ok(ChangeSet {
            descriptor: self.descriptor,
            apply_mode,
            warnings: self.warnings,
            reopen_reasons: self.reopen_reasons,
            deferred: self.deferred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::parse_directives;
    use serde_json::json;

    fn apply(current: &TableDescriptor, elements: &[serde_json::Value]) -> Result<ChangeSet> {
        let directives = parse_directives(elements).unwrap();
        apply_directives(current, &directives, &MutatorConfig::default())
    }

    fn existing_table() -> TableDescriptor {
        TableDescriptor::new("t1")
            .with_family(
                ColumnFamilySpec::new("f1")
                    .with_attribute("VERSIONS", "1")
                    .with_attribute("BLOOMFILTER", "ROW"),
            )
            .with_attribute("DURABILITY", "ASYNC_WAL")
    }

    #[test]
    fn test_empty_directive_list_is_immediate_noop() {
        let current = existing_table();
        let change_set = apply_directives(&current, &[], &MutatorConfig::default()).unwrap();

        assert_eq!(change_set.descriptor, current);
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
        assert!(change_set.warnings.is_empty());
        assert!(!change_set.changes(&current));
    }

    #[test]
    fn test_add_family_requires_reopen() {
        let current = TableDescriptor::new("t1");
        let change_set = apply(&current, &[json!({"NAME": "f1", "VERSIONS": 5})]).unwrap();

        assert_eq!(change_set.apply_mode, ApplyMode::RequiresReopen);
        assert_eq!(
            change_set.descriptor.family("f1").unwrap().attribute("VERSIONS"),
            Some("5")
        );
        assert_eq!(change_set.reopen_reasons, vec!["added family 'f1'"]);
    }

    #[test]
    fn test_modify_family_merges_attributes() {
        let current = existing_table();
        let change_set = apply(&current, &[json!({"NAME": "f1", "VERSIONS": 3})]).unwrap();

        let family = change_set.descriptor.family("f1").unwrap();
        assert_eq!(family.attribute("VERSIONS"), Some("3"));
        assert_eq!(family.attribute("BLOOMFILTER"), Some("ROW"));
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
    }

    #[test]
    fn test_modify_structural_family_attribute_requires_reopen() {
        let current = existing_table();
        let change_set =
            apply(&current, &[json!({"NAME": "f1", "BLOOMFILTER": "ROWCOL"})]).unwrap();

        assert_eq!(change_set.apply_mode, ApplyMode::RequiresReopen);
        assert_eq!(
            change_set.reopen_reasons,
            vec!["modified family 'f1' attribute BLOOMFILTER"]
        );
    }

    #[test]
    fn test_unchanged_structural_family_attribute_is_not_structural() {
        let current = existing_table();
        let change_set = apply(&current, &[json!({"NAME": "f1", "BLOOMFILTER": "ROW"})]).unwrap();
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
    }

    #[test]
    fn test_bare_family_name_on_existing_family_is_noop() {
        let current = existing_table();
        let change_set = apply(&current, &[json!("f1")]).unwrap();
        assert_eq!(change_set.descriptor, current);
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
    }

    #[test]
    fn test_delete_missing_family_fails() {
        let current = existing_table();
        let result = apply(&current, &[json!({"METHOD": "delete", "NAME": "f9"})]);
        assert_eq!(
            result,
            Err(MutationError::FamilyNotFound {
                family: "f9".to_string()
            })
        );
    }

    #[test]
    fn test_add_then_delete_removes_family() {
        let current = TableDescriptor::new("t1");
        let change_set = apply(
            &current,
            &[json!("f2"), json!({"METHOD": "delete", "NAME": "f2"})],
        )
        .unwrap();

        assert!(!change_set.descriptor.has_family("f2"));
        assert_eq!(change_set.apply_mode, ApplyMode::RequiresReopen);
    }

    #[test]
    fn test_delete_then_add_keeps_only_new_attributes() {
        let current = existing_table();
        let change_set = apply(
            &current,
            &[
                json!({"METHOD": "delete", "NAME": "f1"}),
                json!({"NAME": "f1", "VERSIONS": 7}),
            ],
        )
        .unwrap();

        let family = change_set.descriptor.family("f1").unwrap();
        assert_eq!(family.attribute("VERSIONS"), Some("7"));
        assert_eq!(family.attribute("BLOOMFILTER"), None);
    }

    #[test]
    fn test_non_structural_table_attribute_is_immediate() {
        let current = existing_table();
        let change_set = apply(&current, &[json!({"MAX_FILESIZE": "134217728"})]).unwrap();

        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
        assert_eq!(
            change_set.descriptor.attribute("MAX_FILESIZE"),
            Some("134217728")
        );
    }

    #[test]
    fn test_structural_table_attribute_requires_reopen() {
        let current = existing_table();
        let change_set = apply(&current, &[json!({"REGION_REPLICATION": 2})]).unwrap();

        assert_eq!(change_set.apply_mode, ApplyMode::RequiresReopen);
        assert_eq!(
            change_set.reopen_reasons,
            vec!["changed table attribute REGION_REPLICATION"]
        );
    }

    #[test]
    fn test_configured_structural_attribute_requires_reopen() {
        let current = existing_table();
        let directives = parse_directives(&[json!({"DURABILITY": "SYNC_WAL"})]).unwrap();
        let config = MutatorConfig::default().with_structural_table_attribute("durability");

        let change_set = apply_directives(&current, &directives, &config).unwrap();
        assert_eq!(change_set.apply_mode, ApplyMode::RequiresReopen);
    }

    #[test]
    fn test_unset_missing_attribute_fails() {
        let current = existing_table();
        let result = apply(
            &current,
            &[json!({"METHOD": "table_att_unset", "NAME": "MAX_FILESIZE"})],
        );
        assert_eq!(
            result,
            Err(MutationError::AttributeNotFound {
                attribute: "MAX_FILESIZE".to_string()
            })
        );
    }

    #[test]
    fn test_unset_present_attribute_is_immediate() {
        let current = existing_table().with_attribute("MAX_FILESIZE", "1024");
        let change_set = apply(
            &current,
            &[json!({"METHOD": "table_att_unset", "NAME": "MAX_FILESIZE"})],
        )
        .unwrap();

        assert_eq!(change_set.descriptor.attribute("MAX_FILESIZE"), None);
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
    }

    #[test]
    fn test_unset_falls_back_to_metadata_and_coprocessor() {
        let current = existing_table()
            .with_metadata("owner", "ops")
            .with_coprocessor(CoprocessorSpec::new("a.B"))
            .unwrap();
        let change_set = apply(
            &current,
            &[json!({"METHOD": "table_att_unset", "NAME": ["owner", "coprocessor$1"]})],
        )
        .unwrap();

        assert!(change_set.descriptor.metadata().is_empty());
        assert!(change_set.descriptor.coprocessors().is_empty());
        assert_eq!(change_set.descriptor.next_coprocessor_sequence(), Some(2));
    }

    #[test]
    fn test_metadata_is_merged() {
        let current = existing_table().with_metadata("owner", "ops");
        let change_set = apply(
            &current,
            &[json!({"METADATA": {"owner": "data", "tier": "gold"}})],
        )
        .unwrap();

        assert_eq!(
            change_set.descriptor.metadata().get("owner").map(String::as_str),
            Some("data")
        );
        assert_eq!(change_set.descriptor.metadata().len(), 2);
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
    }

    #[test]
    fn test_coprocessor_sequence_numbers_are_never_reused() {
        let current = TableDescriptor::new("t1");
        let change_set = apply(
            &current,
            &[
                json!({"COPROCESSOR": {"CLASSNAME": "A"}}),
                json!({"COPROCESSOR": {"CLASSNAME": "B"}}),
                json!({"METHOD": "table_remove_coprocessor", "CLASSNAME": "A"}),
                json!({"COPROCESSOR": {"CLASSNAME": "C"}}),
            ],
        )
        .unwrap();

        let entries: Vec<(u32, &str)> = change_set
            .descriptor
            .coprocessors()
            .iter()
            .map(|(sequence, spec)| (*sequence, spec.classname.as_str()))
            .collect();
        assert_eq!(entries, vec![(2, "B"), (3, "C")]);
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
    }

    #[test]
    fn test_high_water_survives_removing_last_coprocessor() {
        let current = TableDescriptor::new("t1")
            .with_coprocessor(CoprocessorSpec::new("A"))
            .unwrap()
            .with_coprocessor(CoprocessorSpec::new("B"))
            .unwrap();
        let change_set = apply(
            &current,
            &[
                json!({"METHOD": "table_remove_coprocessor", "CLASSNAME": "B"}),
                json!({"COPROCESSOR": "|C|10|"}),
            ],
        )
        .unwrap();

        let sequences: Vec<u32> = change_set.descriptor.coprocessors().keys().copied().collect();
        assert_eq!(sequences, vec![1, 3]);
    }

    #[test]
    fn test_duplicate_coprocessor_classnames_allowed_and_removed_together() {
        let current = TableDescriptor::new("t1")
            .with_coprocessor(CoprocessorSpec::new("X"))
            .unwrap()
            .with_coprocessor(CoprocessorSpec::new("X"))
            .unwrap();
        let change_set = apply(
            &current,
            &[json!({"METHOD": "table_remove_coprocessor", "CLASSNAME": "X"})],
        )
        .unwrap();

        assert!(change_set.descriptor.coprocessors().is_empty());
        assert!(change_set.warnings.is_empty());
    }

    #[test]
    fn test_remove_missing_coprocessor_warns() {
        let current = TableDescriptor::new("t1")
            .with_coprocessor(CoprocessorSpec::new("X"))
            .unwrap();
        let change_set = apply(
            &current,
            &[json!({"METHOD": "table_remove_coprocessor", "CLASSNAME": ["X", "Y"]})],
        )
        .unwrap();

        assert!(change_set.descriptor.coprocessors().is_empty());
        assert_eq!(
            change_set.warnings,
            vec![MutationError::CoprocessorNotFound {
                classname: "Y".to_string()
            }]
        );
    }

    #[test]
    fn test_repeated_classname_matches_once_without_warning() {
        let current = TableDescriptor::new("t1")
            .with_coprocessor(CoprocessorSpec::new("X"))
            .unwrap();
        let change_set = apply(
            &current,
            &[json!({"METHOD": "table_remove_coprocessor", "CLASSNAME": ["X", "X"]})],
        )
        .unwrap();

        assert!(change_set.descriptor.coprocessors().is_empty());
        assert!(change_set.warnings.is_empty());
    }

    #[test]
    fn test_exhausted_coprocessor_sequence_aborts_batch() {
        let mut current = existing_table();
        current.coprocessor_high_water = u32::MAX;

        let result = apply(
            &current,
            &[
                json!({"MAX_FILESIZE": "1024"}),
                json!({"COPROCESSOR": "a.B"}),
            ],
        );

        assert_eq!(
            result,
            Err(MutationError::CoprocessorSequenceExhausted {
                table: "t1".to_string()
            })
        );
        assert!(current.coprocessors().is_empty());
        assert_eq!(current.attribute("MAX_FILESIZE"), None);
    }

    #[test]
    fn test_table_configuration_set_and_unset() {
        let current = existing_table().with_configuration("hbase.hregion.scan.loadColumnFamiliesOnDemand", "true");
        let change_set = apply(
            &current,
            &[
                json!({"CONFIGURATION": {"hbase.hstore.blockingStoreFiles": "20"}}),
                json!({"METHOD": "table_conf_unset", "NAME": "hbase.hregion.scan.loadColumnFamiliesOnDemand"}),
            ],
        )
        .unwrap();

        let configuration = change_set.descriptor.configuration();
        assert_eq!(configuration.len(), 1);
        assert_eq!(
            configuration
                .get("hbase.hstore.blockingStoreFiles")
                .map(String::as_str),
            Some("20")
        );
        assert_eq!(change_set.apply_mode, ApplyMode::Immediate);
    }

    #[test]
    fn test_family_configuration_is_applied() {
        let current = existing_table();
        let change_set = apply(
            &current,
            &[json!({"NAME": "f1", "CONFIGURATION": {"hbase.hstore.blockingStoreFiles": "10"}})],
        )
        .unwrap();

        let family = change_set.descriptor.family("f1").unwrap();
        assert_eq!(
            family
                .configuration
                .get("hbase.hstore.blockingStoreFiles")
                .map(String::as_str),
            Some("10")
        );
    }

    #[test]
    fn test_unset_missing_configuration_key_fails() {
        let current = existing_table();
        let result = apply(
            &current,
            &[json!({"METHOD": "table_conf_unset", "NAME": "nope"})],
        );
        assert_eq!(
            result,
            Err(MutationError::ConfigKeyNotFound {
                scope: ConfigScope::Table,
                key: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_family_scoped_configuration_on_missing_family_fails() {
        let current = existing_table();
        let result = apply(
            &current,
            &[json!({"METHOD": "table_conf_unset", "NAME": "k", "FAMILY": "f9"})],
        );
        assert_eq!(
            result,
            Err(MutationError::FamilyNotFound {
                family: "f9".to_string()
            })
        );
    }

    #[test]
    fn test_lazy_mode_alone() {
        let current = existing_table();
        let change_set = apply(
            &current,
            &[json!({"METHOD": "lazy_mode", "CONFIGURATION": {"hbase.hstore.compaction.max": "8"}})],
        )
        .unwrap();

        assert_eq!(change_set.apply_mode, ApplyMode::Lazy);
        assert_eq!(change_set.deferred.len(), 1);
        assert_eq!(change_set.deferred[0].scope, ConfigScope::Table);
        assert_eq!(
            change_set
                .descriptor
                .configuration()
                .get("hbase.hstore.compaction.max")
                .map(String::as_str),
            Some("8")
        );
    }

    #[test]
    fn test_lazy_mode_with_family_add_is_incompatible() {
        let current = existing_table();
        let result = apply(
            &current,
            &[
                json!({"METHOD": "lazy_mode", "CONFIGURATION": {"k": "v"}}),
                json!("f2"),
            ],
        );
        assert!(matches!(
            result,
            Err(MutationError::IncompatibleDirectives { .. })
        ));
    }

    #[test]
    fn test_lazy_mode_with_family_delete_is_incompatible() {
        let current = existing_table();
        let result = apply(
            &current,
            &[
                json!({"METHOD": "lazy_mode", "CONFIGURATION": {"k": "v"}}),
                json!({"METHOD": "delete", "NAME": "f1"}),
            ],
        );
        assert!(matches!(
            result,
            Err(MutationError::IncompatibleDirectives { .. })
        ));
    }

    #[test]
    fn test_lazy_mode_with_region_replication_change_is_incompatible() {
        let current = existing_table().with_attribute("REGION_REPLICATION", "1");
        let result = apply(
            &current,
            &[
                json!({"METHOD": "lazy_mode", "CONFIGURATION": {"k": "v"}}),
                json!({"REGION_REPLICATION": 2}),
            ],
        );
        assert!(matches!(
            result,
            Err(MutationError::IncompatibleDirectives { .. })
        ));
    }

    #[test]
    fn test_lazy_mode_with_unchanged_region_replication_is_accepted() {
        let current = existing_table().with_attribute("REGION_REPLICATION", "2");
        let change_set = apply(
            &current,
            &[
                json!({"METHOD": "lazy_mode", "CONFIGURATION": {"k": "v"}}),
                json!({"REGION_REPLICATION": 2}),
            ],
        )
        .unwrap();

        assert_eq!(change_set.apply_mode, ApplyMode::Lazy);
        assert!(change_set.reopen_reasons.is_empty());
    }

    #[test]
    fn test_lazy_mode_with_non_structural_attribute_follows_policy() {
        let current = existing_table();
        let elements = [
            json!({"METHOD": "lazy_mode", "CONFIGURATION": {"k": "v"}}),
            json!({"DURABILITY": "SYNC_WAL"}),
        ];
        let directives = parse_directives(&elements).unwrap();

        let permissive = apply_directives(&current, &directives, &MutatorConfig::default()).unwrap();
        assert_eq!(permissive.apply_mode, ApplyMode::Lazy);

        let strict = MutatorConfig::default().with_lazy_conflict_policy(LazyConflictPolicy::RejectAll);
        assert!(matches!(
            apply_directives(&current, &directives, &strict),
            Err(MutationError::IncompatibleDirectives { .. })
        ));
    }

    #[test]
    fn test_failure_leaves_current_descriptor_untouched() {
        let current = existing_table();
        let snapshot = current.clone();
        let result = apply(
            &current,
            &[
                json!({"MAX_FILESIZE": "1024"}),
                json!({"METHOD": "delete", "NAME": "f9"}),
            ],
        );

        assert!(result.is_err());
        assert_eq!(current, snapshot);
    }
}
