//! Directive parser: raw `alter` arguments to typed [`Directive`] values.

mod error;
mod keys;
mod parser;
mod render;
mod types;

pub use error::{DirectiveError, Result};
pub use keys::{
    coprocessor_key, is_table_attribute, normalize_key, parse_coprocessor_key, TABLE_ATTRIBUTES,
};
pub use parser::{parse_directives, Method};
pub use render::directives_to_values;
pub use types::{
    AttributeMap, ColumnFamilySpec, ConfigScope, ConfigurationOverrides, CoprocessorSpec,
    Directive, TableAttributeSet, DEFAULT_COPROCESSOR_PRIORITY,
};
