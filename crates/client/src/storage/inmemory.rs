use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tablealter_core::authority::{AuthorityError, MetadataAuthority, Result, VersionedDescriptor};
use tablealter_core::descriptor::{ChangeSet, TableDescriptor};

use super::commit_versioned;

/// In-memory metadata authority.
///
/// Data is not persisted and will be lost when the authority is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthority {
    tables: Arc<RwLock<HashMap<String, VersionedDescriptor>>>,
}

impl InMemoryAuthority {
    /// Creates a new empty authority.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataAuthority for InMemoryAuthority {
    async fn fetch_descriptor(&self, table: &str) -> Result<VersionedDescriptor> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .cloned()
            .ok_or_else(|| AuthorityError::TableNotFound(table.to_string()))
    }

    async fn commit(
        &self,
        table: &str,
        change_set: &ChangeSet,
        expected_version: u64,
    ) -> Result<u64> {
        let mut tables = self.tables.write().await;
        commit_versioned(table, tables.get_mut(table), change_set, expected_version)
    }

    async fn create_table(&self, descriptor: TableDescriptor) -> Result<VersionedDescriptor> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(descriptor.name()) {
            return Err(AuthorityError::TableExists(descriptor.name().to_string()));
        }
        let versioned = VersionedDescriptor::initial(descriptor);
        tables.insert(versioned.table().to_string(), versioned.clone());
        Ok(versioned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablealter_core::descriptor::{apply_directives, MutatorConfig};
    use tablealter_core::directive::{ColumnFamilySpec, Directive};

    fn add_family(current: &TableDescriptor, name: &str) -> ChangeSet {
        apply_directives(
            current,
            &[Directive::AddOrModifyFamily(ColumnFamilySpec::new(name))],
            &MutatorConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let authority = InMemoryAuthority::new();
        let created = authority
            .create_table(TableDescriptor::new("t1"))
            .await
            .unwrap();

        let fetched = authority.fetch_descriptor("t1").await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.version, 1);
    }

    #[tokio::test]
    async fn test_create_existing_table_fails() {
        let authority = InMemoryAuthority::new();
        authority
            .create_table(TableDescriptor::new("t1"))
            .await
            .unwrap();

        let result = authority.create_table(TableDescriptor::new("t1")).await;
        assert_eq!(result, Err(AuthorityError::TableExists("t1".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_missing_table() {
        let authority = InMemoryAuthority::new();
        let result = authority.fetch_descriptor("nope").await;
        assert_eq!(result, Err(AuthorityError::TableNotFound("nope".to_string())));
    }

    #[tokio::test]
    async fn test_commit_bumps_version() {
        let authority = InMemoryAuthority::new();
        let created = authority
            .create_table(TableDescriptor::new("t1"))
            .await
            .unwrap();

        let change_set = add_family(&created.descriptor, "f1");
        let version = authority.commit("t1", &change_set, created.version).await.unwrap();

        assert_eq!(version, 2);
        let fetched = authority.fetch_descriptor("t1").await.unwrap();
        assert!(fetched.descriptor.has_family("f1"));
    }

    #[tokio::test]
    async fn test_stale_commit_is_rejected_and_store_unchanged() {
        let authority = InMemoryAuthority::new();
        let created = authority
            .create_table(TableDescriptor::new("t1"))
            .await
            .unwrap();

        let first = add_family(&created.descriptor, "f1");
        authority.commit("t1", &first, created.version).await.unwrap();

        let stale = add_family(&created.descriptor, "f2");
        let result = authority.commit("t1", &stale, created.version).await;
        assert_eq!(
            result,
            Err(AuthorityError::VersionConflict {
                table: "t1".to_string(),
                expected: 1,
                actual: 2,
            })
        );

        let fetched = authority.fetch_descriptor("t1").await.unwrap();
        assert_eq!(fetched.version, 2);
        assert!(fetched.descriptor.has_family("f1"));
        assert!(!fetched.descriptor.has_family("f2"));
    }

    #[tokio::test]
    async fn test_commit_missing_table() {
        let authority = InMemoryAuthority::new();
        let change_set = add_family(&TableDescriptor::new("t1"), "f1");
        let result = authority.commit("t1", &change_set, 1).await;
        assert_eq!(result, Err(AuthorityError::TableNotFound("t1".to_string())));
    }
}
