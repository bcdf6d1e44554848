//! Orchestration: fetch, parse, apply, commit, propagate.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use tablealter_core::authority::{MetadataAuthority, SchemaPropagator, VersionedDescriptor};
use tablealter_core::descriptor::{apply_directives, ChangeSet, MutatorConfig, TableDescriptor};
use tablealter_core::directive::{parse_directives, ColumnFamilySpec};

use crate::error::{ClientError, Result};

/// Options for [`Admin::alter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlterOptions {
    /// Compute the change-set without committing or propagating it.
    pub dry_run: bool,
}

/// Result of an `alter` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterOutcome {
    pub table: String,
    /// Version after the commit, or the fetched version on a dry run.
    pub version: u64,
    pub change_set: ChangeSet,
    pub committed: bool,
}

/// Administrative entry point over a metadata authority and a propagator.
pub struct Admin<A, P> {
    authority: A,
    propagator: P,
    config: MutatorConfig,
}

impl<A, P> Admin<A, P>
where
    A: MetadataAuthority,
    P: SchemaPropagator,
{
    pub fn new(authority: A, propagator: P) -> Self {
        Self {
            authority,
            propagator,
            config: MutatorConfig::default(),
        }
    }

    pub fn with_mutator_config(mut self, config: MutatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Creates a table with the given bare column families.
    pub async fn create(&self, table: &str, families: &[String]) -> Result<VersionedDescriptor> {
        if table.trim().is_empty() {
            return Err(ClientError::InvalidInput("table name is empty".to_string()));
        }

        let mut descriptor = TableDescriptor::new(table);
        for family in families {
            if family.trim().is_empty() {
                return Err(ClientError::InvalidInput(
                    "column family name is empty".to_string(),
                ));
            }
            descriptor = descriptor.with_family(ColumnFamilySpec::new(family.as_str()));
        }

        let created = self.authority.create_table(descriptor).await?;
        info!(table = %table, version = created.version, "Table created");
        Ok(created)
    }

    /// Returns the stored descriptor of a table.
    pub async fn describe(&self, table: &str) -> Result<VersionedDescriptor> {
        Ok(self.authority.fetch_descriptor(table).await?)
    }

    /// Applies `elements` to `table`.
    ///
    /// The commit is conditional on the version fetched at the start of the
    /// call; a concurrent writer surfaces as a version conflict, never a retry.
    pub async fn alter(
        &self,
        table: &str,
        elements: &[Value],
        options: AlterOptions,
    ) -> Result<AlterOutcome> {
        let current = self.authority.fetch_descriptor(table).await?;
        let directives = parse_directives(elements)?;
        debug!(
            table = %table,
            version = current.version,
            directives = directives.len(),
            "Parsed directives"
        );

        let change_set = apply_directives(&current.descriptor, &directives, &self.config)?;
        for warning in &change_set.warnings {
            warn!(table = %table, "{}", warning);
        }

        if options.dry_run {
            debug!(table = %table, mode = %change_set.apply_mode, "Dry run, nothing committed");
            return Ok(AlterOutcome {
                table: table.to_string(),
                version: current.version,
                change_set,
                committed: false,
            });
        }

        let version = self
            .authority
            .commit(table, &change_set, current.version)
            .await?;
        info!(
            table = %table,
            version,
            mode = %change_set.apply_mode,
            "Descriptor committed"
        );

        self.propagator.propagate(table, &change_set).await?;
        info!(table = %table, mode = %change_set.apply_mode, "Change-set propagated");

        Ok(AlterOutcome {
            table: table.to_string(),
            version,
            change_set,
            committed: true,
        })
    }
}
