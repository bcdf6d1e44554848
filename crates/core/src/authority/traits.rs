use async_trait::async_trait;

use crate::descriptor::{ChangeSet, TableDescriptor};

use super::{Result, VersionedDescriptor};

/// The system of record for table descriptors.
#[async_trait]
pub trait MetadataAuthority: Send + Sync {
    /// Fetches a table's descriptor and its current version.
    async fn fetch_descriptor(&self, table: &str) -> Result<VersionedDescriptor>;

    /// Stores `change_set.descriptor` if the stored version still equals
    /// `expected_version`, returning the new version.
    async fn commit(&self, table: &str, change_set: &ChangeSet, expected_version: u64)
        -> Result<u64>;

    /// Registers a new table.
    async fn create_table(&self, descriptor: TableDescriptor) -> Result<VersionedDescriptor>;
}

/// Consumes committed change-sets and pushes them to serving nodes.
#[async_trait]
pub trait SchemaPropagator: Send + Sync {
    async fn propagate(&self, table: &str, change_set: &ChangeSet) -> Result<()>;
}
