//! Schema propagator that reports change-sets through `tracing`.

use async_trait::async_trait;
use tracing::info;

use tablealter_core::authority::{Result, SchemaPropagator};
use tablealter_core::descriptor::{ApplyMode, ChangeSet};

/// Logs what serving nodes would have to do for each committed change-set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPropagator;

#[async_trait]
impl SchemaPropagator for TracingPropagator {
    async fn propagate(&self, table: &str, change_set: &ChangeSet) -> Result<()> {
        match change_set.apply_mode {
            ApplyMode::Immediate => {
                info!(table = %table, mode = %change_set.apply_mode, "Descriptor updated in place");
            }
            ApplyMode::RequiresReopen => {
                for reason in &change_set.reopen_reasons {
                    info!(table = %table, reason = %reason, "Regions must reopen");
                }
            }
            ApplyMode::Lazy => {
                for deferred in &change_set.deferred {
                    info!(
                        table = %table,
                        scope = %deferred.scope,
                        keys = deferred.overrides.len(),
                        "Configuration deferred until regions reload"
                    );
                }
            }
        }
        Ok(())
    }
}
