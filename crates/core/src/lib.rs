//! Pure table alteration logic - no I/O, no async execution, no side effects.
//!
//! This crate provides:
//! - The directive parser, turning loosely-typed `alter` arguments into [`directive::Directive`] values
//! - The descriptor mutator, applying directives to a [`descriptor::TableDescriptor`]
//! - Contracts for the metadata authority and schema propagator collaborators
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tablealter_core::descriptor::{apply_directives, ApplyMode, MutatorConfig, TableDescriptor};
//! use tablealter_core::directive::parse_directives;
//!
//! let current = TableDescriptor::new("t1");
//! let directives = parse_directives(&[json!({"NAME": "f1", "VERSIONS": 5})]).unwrap();
//!
//! let change_set = apply_directives(&current, &directives, &MutatorConfig::default()).unwrap();
//! assert_eq!(change_set.apply_mode, ApplyMode::RequiresReopen);
//! assert_eq!(
//!     change_set.descriptor.family("f1").unwrap().attribute("VERSIONS"),
//!     Some("5")
//! );
//! ```

pub mod authority;
pub mod descriptor;
pub mod directive;
