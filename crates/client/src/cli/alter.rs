//! `alter` command.

use clap::{Parser, ValueEnum};
use serde_json::Value;

use tablealter_core::descriptor::LazyConflictPolicy;

/// Apply alteration directives to a table.
///
/// Each ARG is a JSON value such as `{"NAME":"f1","VERSIONS":5}` or
/// `{"METHOD":"delete","NAME":"f1"}`. Anything else that is not a JSON
/// string, object or array (e.g. `f1`, `5`, `true`) is taken as a bare column
/// family name.
#[derive(Debug, Parser)]
pub struct AlterCommand {
    /// Table name.
    pub table: String,

    /// Show the resulting change-set without committing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Which directives may accompany lazy_mode.
    #[arg(long)]
    pub lazy_policy: Option<LazyPolicy>,

    /// Alteration directives.
    #[arg(required = true)]
    pub args: Vec<String>,
}

impl AlterCommand {
    /// Directive elements in argument order.
    pub fn elements(&self) -> Vec<Value> {
        self.args.iter().map(|arg| parse_arg(arg)).collect()
    }
}

/// CLI lazy conflict policy (with clap ValueEnum).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LazyPolicy {
    Structural,
    RejectAll,
}

impl From<LazyPolicy> for LazyConflictPolicy {
    fn from(policy: LazyPolicy) -> Self {
        match policy {
            LazyPolicy::Structural => LazyConflictPolicy::StructuralOnly,
            LazyPolicy::RejectAll => LazyConflictPolicy::RejectAll,
        }
    }
}

/// Parses one argument as JSON, falling back to a bare string.
///
/// Non-string JSON scalars are family names too.
pub fn parse_arg(arg: &str) -> Value {
    match serde_json::from_str(arg) {
        Ok(value @ (Value::String(_) | Value::Object(_) | Value::Array(_))) => value,
        _ => Value::String(arg.to_string()),
    }
}
