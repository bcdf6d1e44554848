mod config;
mod error;
mod mutator;
mod types;

pub use config::{
    LazyConflictPolicy, MutatorConfig, DEFAULT_STRUCTURAL_FAMILY_ATTRIBUTES,
    DEFAULT_STRUCTURAL_TABLE_ATTRIBUTES,
};
pub use error::{MutationError, Result};
pub use mutator::apply_directives;
pub use types::{ApplyMode, ChangeSet, DeferredConfiguration, TableDescriptor};
