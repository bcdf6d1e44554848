use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::descriptor::TableDescriptor;

/// Version assigned to a freshly created table.
pub const INITIAL_VERSION: u64 = 1;

/// A descriptor together with the version token used for optimistic commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedDescriptor {
    pub version: u64,
    pub updated_at: DateTime<Utc>,
    pub descriptor: TableDescriptor,
}

impl VersionedDescriptor {
    /// Wraps a new table's descriptor at [`INITIAL_VERSION`].
    pub fn initial(descriptor: TableDescriptor) -> Self {
        Self {
            version: INITIAL_VERSION,
            updated_at: Utc::now(),
            descriptor,
        }
    }

    /// Returns the successor of this version holding `descriptor`.
    pub fn next(&self, descriptor: TableDescriptor) -> Self {
        Self {
            version: self.version + 1,
            updated_at: Utc::now(),
            descriptor,
        }
    }

    pub fn table(&self) -> &str {
        self.descriptor.name()
    }
}
