//! Output formatting functions.

pub mod json;
pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Human-readable rendering of a command result.
pub trait Pretty {
    fn pretty(&self) -> String;
}

/// Format a command result for stdout.
pub fn format_output<T: Serialize + Pretty>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => Ok(value.pretty()),
    }
}
