//! Contracts for the collaborators that persist and propagate descriptors.
//!
//! The core never implements these; the client crate provides in-memory and
//! file-backed authorities.

mod error;
mod traits;
mod types;

pub use error::{AuthorityError, Result};
pub use traits::{MetadataAuthority, SchemaPropagator};
pub use types::{VersionedDescriptor, INITIAL_VERSION};
