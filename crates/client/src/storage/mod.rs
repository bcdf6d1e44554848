//! Metadata authority implementations.
//!
//! - [`InMemoryAuthority`]: descriptors in a `HashMap` behind `Arc<RwLock<_>>`,
//!   for tests and development.
//! - [`JsonFileAuthority`]: a single JSON document on disk, used by the CLI.

mod file;
mod inmemory;

pub use file::JsonFileAuthority;
pub use inmemory::InMemoryAuthority;

use tablealter_core::authority::{AuthorityError, Result, VersionedDescriptor};
use tablealter_core::descriptor::ChangeSet;

/// Replaces `stored` with the change-set's descriptor if its version matches.
fn commit_versioned(
    table: &str,
    stored: Option<&mut VersionedDescriptor>,
    change_set: &ChangeSet,
    expected_version: u64,
) -> Result<u64> {
    let stored = stored.ok_or_else(|| AuthorityError::TableNotFound(table.to_string()))?;
    if stored.version != expected_version {
        return Err(AuthorityError::VersionConflict {
            table: table.to_string(),
            expected: expected_version,
            actual: stored.version,
        });
    }
    *stored = stored.next(change_set.descriptor.clone());
    Ok(stored.version)
}
