//! `describe` command.

use clap::Parser;

/// Show the stored descriptor and version of a table.
#[derive(Debug, Parser)]
pub struct DescribeCommand {
    /// Table name.
    pub table: String,
}
