//! Draining the registry into the external store in dependency order

mod memory;

pub use memory::MemorySink;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;

use crate::records::{State, StoreIdentity};
use crate::tables::{Registry, TableKind};

/// The external table store, as seen by the writer
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Create a row and return the identity the store assigned to it
    async fn create(&self, kind: TableKind, fields: Value) -> Result<StoreIdentity>;

    /// Replace the fields of an existing row
    async fn update(&self, kind: TableKind, id: &str, fields: Value) -> Result<()>;
}

/// Row counts for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableReport {
    pub kind: TableKind,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Outcome of [`write_in_order`], one entry per table written, in write order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub tables: Vec<TableReport>,
}

impl WriteReport {
    pub fn created(&self) -> usize {
        self.tables.iter().map(|t| t.created).sum()
    }

    pub fn updated(&self) -> usize {
        self.tables.iter().map(|t| t.updated).sum()
    }

    pub fn skipped(&self) -> usize {
        self.tables.iter().map(|t| t.skipped).sum()
    }

    pub fn for_kind(&self, kind: TableKind) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.kind == kind)
    }
}

/// Write the selected tables of `registry` to `sink`.
///
/// Tables are visited in dependency order whatever the order of `kinds`.
/// Before a row is written, relationship identifiers equal to the forge id of
/// an already-written row of the target table are replaced by that row's
/// store id. Rows without a store id are created, `Changed` rows are
/// updated, everything else is skipped. Only written rows become
/// `Unchanged`; a skipped row keeps its state.
///
/// The first sink error stops the write.
pub async fn write_in_order(
    registry: &mut Registry,
    sink: &dyn RecordSink,
    kinds: &[TableKind],
) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for kind in TableKind::ALL {
        if !kinds.contains(&kind) {
            debug!("Skipping {} table, not selected", kind);
            continue;
        }

        let resolvers: HashMap<TableKind, HashMap<String, String>> = kind
            .dependencies()
            .into_iter()
            .map(|dep| (dep, registry.table(dep).store_ids_by_base_id()))
            .collect();

        let table = registry.table_mut(kind);
        let mut table_report = TableReport {
            kind,
            created: 0,
            updated: 0,
            skipped: 0,
        };

        info!("Writing {} {} records", table.len(), kind);
        for idx in 0..table.len() {
            let rewritten = table.resolve_relationships_at(idx, |target, id| {
                resolvers.get(&target).and_then(|ids| ids.get(id)).cloned()
            });
            if rewritten > 0 {
                debug!("Resolved {} relationship ids on {} row {}", rewritten, kind, idx);
            }

            let state = table.state_at(idx).unwrap_or_default();
            let store_id = table.store_id_at(idx).map(str::to_string);
            let fields = table.fields_at(idx).unwrap_or(Value::Null);

            match (state, store_id) {
                (State::Unchanged, _) => {
                    table_report.skipped += 1;
                    continue;
                }
                (State::Changed, Some(id)) => {
                    sink.update(kind, &id, fields)
                        .await
                        .with_context(|| format!("Failed to update {} row {} ({})", kind, idx, id))?;
                    table_report.updated += 1;
                }
                (_, None) => {
                    let identity = sink
                        .create(kind, fields)
                        .await
                        .with_context(|| format!("Failed to create {} row {}", kind, idx))?;
                    debug!("Created {} row {} as {:?}", kind, idx, identity.id);
                    table.set_store_identity(idx, identity);
                    table_report.created += 1;
                }
                (_, Some(id)) => {
                    // already in the store but never compared: leave the state alone
                    debug!("Skipping {} row {} ({}), state {}", kind, idx, id, state);
                    table_report.skipped += 1;
                    continue;
                }
            }
            table.set_state(idx, State::Unchanged);
        }

        info!(
            "Finished {} table: {} created, {} updated, {} skipped",
            kind, table_report.created, table_report.updated, table_report.skipped
        );
        report.tables.push(table_report);
    }

    Ok(report)
}
