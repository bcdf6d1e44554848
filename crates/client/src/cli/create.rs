//! `create` command.

use clap::Parser;

/// Create a table with optional bare column families.
#[derive(Debug, Parser)]
pub struct CreateCommand {
    /// Table name.
    pub table: String,
    /// Column family names.
    pub families: Vec<String>,
}
