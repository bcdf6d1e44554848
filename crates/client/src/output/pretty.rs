//! Pretty output formatting.

use std::collections::BTreeMap;

use tablealter_core::authority::VersionedDescriptor;
use tablealter_core::descriptor::{ChangeSet, TableDescriptor};

use crate::admin::AlterOutcome;

use super::Pretty;

fn push_map(output: &mut String, title: &str, indent: &str, map: &BTreeMap<String, String>) {
    if map.is_empty() {
        return;
    }
    output.push_str(&format!("\n{}{}:", indent, title));
    for (key, value) in map {
        output.push_str(&format!("\n{}  {} => {}", indent, key, value));
    }
}

/// Format a descriptor for display.
pub fn format_descriptor(descriptor: &TableDescriptor) -> String {
    let mut output = format!("TABLE {}", descriptor.name());
    push_map(&mut output, "Attributes", "  ", descriptor.attributes());
    push_map(&mut output, "Metadata", "  ", descriptor.metadata());
    push_map(&mut output, "Configuration", "  ", descriptor.configuration());

    let coprocessors = descriptor.coprocessor_attributes();
    if !coprocessors.is_empty() {
        output.push_str("\n  Coprocessors:");
        for (key, value) in coprocessors {
            output.push_str(&format!("\n    {} => {}", key, value));
        }
    }

    output.push_str(&format!("\nFAMILIES ({})\n", descriptor.families().len()));
    output.push_str(&"-".repeat(40));
    for family in descriptor.families().values() {
        output.push_str(&format!("\n{}", family.name));
        push_map(&mut output, "Attributes", "  ", &family.attributes);
        push_map(&mut output, "Configuration", "  ", &family.configuration);
    }
    output
}

/// Format a stored descriptor with its version.
pub fn format_versioned(versioned: &VersionedDescriptor) -> String {
    format!(
        "{}\n  Version: {}\n  Updated: {}",
        format_descriptor(&versioned.descriptor),
        versioned.version,
        versioned.updated_at.to_rfc3339()
    )
}

/// Format a change-set summary (mode, reasons, warnings, deferred config).
pub fn format_change_set(change_set: &ChangeSet) -> String {
    let mut output = format!("Apply mode: {}", change_set.apply_mode);
    for reason in &change_set.reopen_reasons {
        output.push_str(&format!("\n  Reopen: {}", reason));
    }
    for deferred in &change_set.deferred {
        output.push_str(&format!("\n  Deferred ({}):", deferred.scope));
        for (key, value) in &deferred.overrides {
            output.push_str(&format!("\n    {} => {}", key, value));
        }
    }
    for warning in &change_set.warnings {
        output.push_str(&format!("\n  Warning: {}", warning));
    }
    output
}

/// Format the result of an alter call.
pub fn format_outcome(outcome: &AlterOutcome) -> String {
    let status = if outcome.committed {
        format!("Committed {} at version {}", outcome.table, outcome.version)
    } else {
        format!(
            "Dry run for {} (version {} unchanged)",
            outcome.table, outcome.version
        )
    };
    format!(
        "{}\n{}\n{}",
        status,
        format_change_set(&outcome.change_set),
        format_descriptor(&outcome.change_set.descriptor)
    )
}

impl Pretty for VersionedDescriptor {
    fn pretty(&self) -> String {
        format_versioned(self)
    }
}

impl Pretty for ChangeSet {
    fn pretty(&self) -> String {
        format_change_set(self)
    }
}

impl Pretty for AlterOutcome {
    fn pretty(&self) -> String {
        format_outcome(self)
    }
}
