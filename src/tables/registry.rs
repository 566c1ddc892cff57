//! Fixed-order registry holding one table per kind

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::Value;

use super::{NUM_TABLES, Table, TableKind, declared_kinds, lookup_kind};
use crate::records::{Record, RecordFields};

/// One table per kind, indexed by [`TableKind::index`].
///
/// Iteration always follows dependency order, whatever order the tables were
/// populated in.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    tables: Vec<Table>,
}

impl Registry {
    /// Allocate one empty table per kind.
    ///
    /// # Panics
    /// When the slots drift from the declared kinds: a missing or duplicate
    /// slot, or a kind placed before one of its dependencies. That is a
    /// defect in the catalog, not a runtime condition.
    pub fn new() -> Self {
        let declared = declared_kinds();
        assert_eq!(
            declared.len(),
            NUM_TABLES,
            "catalog declares {} kinds for {} table slots",
            declared.len(),
            NUM_TABLES
        );

        let tables: Vec<Table> = declared.iter().map(|&kind| Table::empty(kind)).collect();
        for (idx, table) in tables.iter().enumerate() {
            let kind = table.kind();
            assert_eq!(
                kind.index(),
                idx,
                "table slot {} holds the {} table",
                idx,
                kind
            );
            assert_eq!(
                TableKind::from_index(idx),
                Some(kind),
                "table slot {} is not listed in TableKind::ALL",
                idx
            );
            for dep in kind.dependencies() {
                assert!(
                    dep.index() < idx,
                    "{} table is registered before its dependency {}",
                    kind,
                    dep
                );
            }
        }

        Self { tables }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, kind: TableKind) -> &Table {
        &self.tables[kind.index()]
    }

    pub fn table_mut(&mut self, kind: TableKind) -> &mut Table {
        &mut self.tables[kind.index()]
    }

    /// Table at a slot returned by [`super::lookup`]
    pub fn table_at(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    /// `(kind, table)` pairs in dependency order.
    ///
    /// Each call starts over from the first slot.
    pub fn iter_in_order(&self) -> impl Iterator<Item = (TableKind, &Table)> + Clone + '_ {
        TableKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.table(kind)))
    }

    pub fn records<F: RecordFields>(&self) -> &Vec<Record<F>> {
        match F::records(self.table(F::KIND)) {
            Some(records) => records,
            None => unreachable!("slot {} does not hold {} records", F::KIND.index(), F::KIND),
        }
    }

    pub fn records_mut<F: RecordFields>(&mut self) -> &mut Vec<Record<F>> {
        match F::records_mut(self.table_mut(F::KIND)) {
            Some(records) => records,
            None => unreachable!("slot {} does not hold {} records", F::KIND.index(), F::KIND),
        }
    }

    pub fn push<F: RecordFields>(&mut self, record: Record<F>) {
        self.records_mut::<F>().push(record);
    }

    /// Number of rows across every table
    pub fn len_total(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }

    /// Populate tables from an object keyed by kind name, each value an
    /// array of records in their external representation.
    ///
    /// Unknown kind names are skipped with a warning. Every row is parsed
    /// before any is appended, so on error the registry is left untouched.
    /// Returns how many rows were appended.
    pub fn load_snapshot(&mut self, snapshot: &Value) -> Result<usize> {
        let object = snapshot
            .as_object()
            .context("Snapshot must be an object keyed by table name")?;

        let mut staged: Vec<Table> = TableKind::ALL.iter().map(|&kind| Table::empty(kind)).collect();
        for (name, rows) in object {
            let Some(kind) = lookup_kind(name) else {
                warn!("Skipping unknown table '{}' in snapshot", name);
                continue;
            };

            let rows = rows
                .as_array()
                .with_context(|| format!("Table '{}' must be an array of records", name))?;

            let table = &mut staged[kind.index()];
            for (row_idx, row) in rows.iter().enumerate() {
                table
                    .append_json(row.clone())
                    .with_context(|| format!("Invalid row {} in table '{}'", row_idx, name))?;
            }
            debug!("Parsed {} {} records", rows.len(), kind);
        }

        let mut appended = 0;
        for table in staged {
            appended += table.len();
            let kind = table.kind();
            self.table_mut(kind).append_table(table)?;
        }

        info!("Loaded snapshot with {} records", appended);
        Ok(appended)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
