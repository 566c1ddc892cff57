//! In-process store used for dry runs and tests

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::RecordSink;
use crate::records::StoreIdentity;
use crate::tables::{Registry, TableKind};

#[derive(Debug, Default)]
struct MemoryTables {
    rows: HashMap<TableKind, HashMap<String, Value>>,
    created: Vec<(TableKind, String)>,
}

/// A [`RecordSink`] keeping rows in memory.
///
/// Like the real store, it refuses rows whose relationship columns point at
/// identifiers it does not hold.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<MemoryTables>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every create so far, in call order
    pub fn created(&self) -> Vec<(TableKind, String)> {
        self.inner
            .lock()
            .map(|tables| tables.created.clone())
            .unwrap_or_default()
    }

    /// Stored fields of row `id`
    pub fn get(&self, kind: TableKind, id: &str) -> Option<Value> {
        let tables = self.inner.lock().ok()?;
        tables.rows.get(&kind)?.get(id).cloned()
    }

    pub fn len(&self, kind: TableKind) -> usize {
        self.inner
            .lock()
            .map(|tables| tables.rows.get(&kind).map_or(0, HashMap::len))
            .unwrap_or(0)
    }

    /// Store a row under an identity it already has, without checking its
    /// relationships
    pub fn seed(&self, kind: TableKind, id: &str, fields: Value) -> Result<()> {
        let mut tables = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory sink lock poisoned"))?;
        debug!("Memory sink: seed {} {}", kind, id);
        tables
            .rows
            .entry(kind)
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    /// Seed every row of `registry` that already carries a store id.
    /// Returns how many rows were seeded.
    pub fn seed_registry(&self, registry: &Registry) -> Result<usize> {
        let mut seeded = 0;
        for (kind, table) in registry.iter_in_order() {
            for idx in 0..table.len() {
                if let Some(id) = table.store_id_at(idx) {
                    self.seed(kind, id, table.fields_at(idx).unwrap_or(Value::Null))?;
                    seeded += 1;
                }
            }
        }
        Ok(seeded)
    }

    fn next_id() -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("rec{}", &uuid[..14])
    }
}

impl MemoryTables {
    fn check_relationships(&self, kind: TableKind, fields: &Value) -> Result<()> {
        for rel in kind.relationship_columns() {
            let Some(ids) = fields.get(rel.column).and_then(Value::as_array) else {
                continue;
            };
            for id in ids {
                let id = id
                    .as_str()
                    .ok_or_else(|| anyhow!("Column '{}' holds a non-string id", rel.column))?;
                let known = self
                    .rows
                    .get(&rel.target)
                    .is_some_and(|rows| rows.contains_key(id));
                if !known {
                    anyhow::bail!(
                        "Column '{}' of {} references unknown {} row '{}'",
                        rel.column,
                        kind,
                        rel.target,
                        id
                    );
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn create(&self, kind: TableKind, fields: Value) -> Result<StoreIdentity> {
        let mut tables = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory sink lock poisoned"))?;
        tables.check_relationships(kind, &fields)?;

        let id = Self::next_id();
        debug!("Memory sink: create {} {}", kind, id);
        tables
            .rows
            .entry(kind)
            .or_default()
            .insert(id.clone(), fields);
        tables.created.push((kind, id.clone()));

        Ok(StoreIdentity {
            id: Some(id),
            created_time: Some(Utc::now()),
        })
    }

    async fn update(&self, kind: TableKind, id: &str, fields: Value) -> Result<()> {
        let mut tables = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory sink lock poisoned"))?;
        tables.check_relationships(kind, &fields)?;

        let row = tables
            .rows
            .get_mut(&kind)
            .and_then(|rows| rows.get_mut(id))
            .ok_or_else(|| anyhow!("No {} row with id '{}'", kind, id))?;
        debug!("Memory sink: update {} {}", kind, id);
        *row = fields;
        Ok(())
    }
}
