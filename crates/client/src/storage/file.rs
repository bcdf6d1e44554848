use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use tablealter_core::authority::{AuthorityError, MetadataAuthority, Result, VersionedDescriptor};
use tablealter_core::descriptor::{ChangeSet, TableDescriptor};

use super::commit_versioned;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    tables: BTreeMap<String, VersionedDescriptor>,
}

/// How long a writer waits for another process to release the store.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Metadata authority backed by one JSON document on disk.
///
/// Every operation reads the whole document; writes go to a uniquely named
/// sibling temporary file that is then renamed over the original. Writers in
/// different processes are serialized by a `<path>.lock` file created
/// exclusively for the duration of the read-check-write; within a process a
/// mutex does the same. A lock file left behind by a crashed process must be
/// removed by hand.
#[derive(Debug)]
pub struct JsonFileAuthority {
    path: PathBuf,
    lock: Mutex<()>,
    lock_timeout: Duration,
}

impl JsonFileAuthority {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }

    async fn lock_store(&self) -> Result<StoreLock> {
        StoreLock::acquire(self.sibling(".lock"), self.lock_timeout).await
    }

    async fn load(&self) -> Result<StoreDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AuthorityError::Storage(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    async fn save(&self, document: &StoreDocument) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| AuthorityError::Storage(e.to_string()))?;

        let tmp = self.sibling(&format!(".{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(storage_error(&self.path, e));
        }
        Ok(())
    }
}

/// Exclusive lock file, removed when dropped.
#[derive(Debug)]
struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    async fn acquire(path: PathBuf, timeout: Duration) -> Result<Self> {
        let deadline = Instant::now() + timeout;
        loop {
            let created = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            match created {
                Ok(_) => return Ok(Self { path }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(AuthorityError::Storage(format!(
                            "{} is held by another writer",
                            path.display()
                        )));
                    }
                    tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
                }
                Err(e) => return Err(storage_error(&path, e)),
            }
        }
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn storage_error(path: &Path, error: std::io::Error) -> AuthorityError {
    AuthorityError::Storage(format!("{}: {}", path.display(), error))
}

#[async_trait]
impl MetadataAuthority for JsonFileAuthority {
    async fn fetch_descriptor(&self, table: &str) -> Result<VersionedDescriptor> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        document
            .tables
            .remove(table)
            .ok_or_else(|| AuthorityError::TableNotFound(table.to_string()))
    }

    async fn commit(
        &self,
        table: &str,
        change_set: &ChangeSet,
        expected_version: u64,
    ) -> Result<u64> {
        let _guard = self.lock.lock().await;
        let _store_lock = self.lock_store().await?;
        let mut document = self.load().await?;
        let version = commit_versioned(
            table,
            document.tables.get_mut(table),
            change_set,
            expected_version,
        )?;
        self.save(&document).await?;
        Ok(version)
    }

    async fn create_table(&self, descriptor: TableDescriptor) -> Result<VersionedDescriptor> {
        let _guard = self.lock.lock().await;
        let _store_lock = self.lock_store().await?;
        let mut document = self.load().await?;
        if document.tables.contains_key(descriptor.name()) {
            return Err(AuthorityError::TableExists(descriptor.name().to_string()));
        }
        let versioned = VersionedDescriptor::initial(descriptor);
        document
            .tables
            .insert(versioned.table().to_string(), versioned.clone());
        self.save(&document).await?;
        Ok(versioned)
    }
}
