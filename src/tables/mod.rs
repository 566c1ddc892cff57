//! Table kinds, the name lookup, and the per-kind table container

mod registry;

pub use registry::Registry;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde_json::Value;
use log::warn;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::records::{
    AccountRecord, IssueRecord, LabelRecord, MilestoneRecord, ProviderRecord, RecordFields,
    RelationshipColumn, RepositoryRecord, State, StoreIdentity,
};
use crate::records::{
    AccountFields, IssueFields, LabelFields, MilestoneFields, ProviderFields, RepositoryFields,
};

/// Number of registry slots, one per kind
pub const NUM_TABLES: usize = 6;

/// Record kinds, in dependency order.
///
/// A kind is always listed after every kind its relationship columns point
/// at, so writing tables in this order lets each relationship be resolved to
/// a row that already exists in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    Provider = 0,
    Label = 1,
    Account = 2,
    Repository = 3,
    Milestone = 4,
    Issue = 5,
}

impl TableKind {
    pub const ALL: [TableKind; NUM_TABLES] = [
        TableKind::Provider,
        TableKind::Label,
        TableKind::Account,
        TableKind::Repository,
        TableKind::Milestone,
        TableKind::Issue,
    ];

    pub const FIRST: TableKind = TableKind::Provider;

    /// The kind written right after this one.
    ///
    /// The match is exhaustive, so a new kind does not compile until it is
    /// given a place in the chain; [`declared_kinds`] walks it.
    pub const fn successor(self) -> Option<TableKind> {
        match self {
            TableKind::Provider => Some(TableKind::Label),
            TableKind::Label => Some(TableKind::Account),
            TableKind::Account => Some(TableKind::Repository),
            TableKind::Repository => Some(TableKind::Milestone),
            TableKind::Milestone => Some(TableKind::Issue),
            TableKind::Issue => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name used by [`lookup`] and snapshot files
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Provider => "provider",
            TableKind::Label => "label",
            TableKind::Account => "account",
            TableKind::Repository => "repository",
            TableKind::Milestone => "milestone",
            TableKind::Issue => "issue",
        }
    }

    pub fn relationship_columns(self) -> &'static [RelationshipColumn] {
        match self {
            TableKind::Provider => ProviderFields::RELATIONSHIPS,
            TableKind::Label => LabelFields::RELATIONSHIPS,
            TableKind::Account => AccountFields::RELATIONSHIPS,
            TableKind::Repository => RepositoryFields::RELATIONSHIPS,
            TableKind::Milestone => MilestoneFields::RELATIONSHIPS,
            TableKind::Issue => IssueFields::RELATIONSHIPS,
        }
    }

    /// Kinds this kind references, deduplicated, in dependency order
    pub fn dependencies(self) -> Vec<TableKind> {
        let mut deps: Vec<TableKind> = self
            .relationship_columns()
            .iter()
            .map(|rel| rel.target)
            .collect();
        deps.sort();
        deps.dedup();
        deps
    }
}

/// Every kind reachable from [`TableKind::FIRST`] through
/// [`TableKind::successor`], in order. Stops one past `NUM_TABLES` so a
/// cycle or an extra kind shows up as a length mismatch.
pub fn declared_kinds() -> Vec<TableKind> {
    let mut kinds = Vec::with_capacity(NUM_TABLES);
    let mut next = Some(TableKind::FIRST);
    while let Some(kind) = next {
        kinds.push(kind);
        if kinds.len() > NUM_TABLES {
            break;
        }
        next = kind.successor();
    }
    kinds
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static TABLE_NAME_TO_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    TableKind::ALL
        .iter()
        .map(|kind| (kind.name(), kind.index()))
        .collect()
});

/// Resolve a lowercase kind name to its registry slot.
///
/// Matching is exact and case-sensitive; an unknown name is `None`.
pub fn lookup(name: &str) -> Option<usize> {
    TABLE_NAME_TO_INDEX.get(name).copied()
}

pub fn lookup_kind(name: &str) -> Option<TableKind> {
    lookup(name).and_then(TableKind::from_index)
}

/// A homogeneous collection of records of one kind
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    Provider(Vec<ProviderRecord>),
    Label(Vec<LabelRecord>),
    Account(Vec<AccountRecord>),
    Repository(Vec<RepositoryRecord>),
    Milestone(Vec<MilestoneRecord>),
    Issue(Vec<IssueRecord>),
}

/// Run `$body` against the rows of any table variant
macro_rules! with_records {
    ($table:expr, $records:ident => $body:expr) => {
        match $table {
            Table::Provider($records) => $body,
            Table::Label($records) => $body,
            Table::Account($records) => $body,
            Table::Repository($records) => $body,
            Table::Milestone($records) => $body,
            Table::Issue($records) => $body,
        }
    };
}

impl Table {
    pub fn empty(kind: TableKind) -> Self {
        match kind {
            TableKind::Provider => Table::Provider(Vec::new()),
            TableKind::Label => Table::Label(Vec::new()),
            TableKind::Account => Table::Account(Vec::new()),
            TableKind::Repository => Table::Repository(Vec::new()),
            TableKind::Milestone => Table::Milestone(Vec::new()),
            TableKind::Issue => Table::Issue(Vec::new()),
        }
    }

    pub fn kind(&self) -> TableKind {
        match self {
            Table::Provider(_) => TableKind::Provider,
            Table::Label(_) => TableKind::Label,
            Table::Account(_) => TableKind::Account,
            Table::Repository(_) => TableKind::Repository,
            Table::Milestone(_) => TableKind::Milestone,
            Table::Issue(_) => TableKind::Issue,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn len(&self) -> usize {
        with_records!(self, records => records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forge-side identifier of row `idx`
    pub fn base_id_at(&self, idx: usize) -> Option<&str> {
        with_records!(self, records => records.get(idx).map(|r| r.base_id()))
    }

    /// Store identifier of row `idx`, if it has been written
    pub fn store_id_at(&self, idx: usize) -> Option<&str> {
        with_records!(self, records => records.get(idx).and_then(|r| r.store_id()))
    }

    pub fn state_at(&self, idx: usize) -> Option<State> {
        with_records!(self, records => records.get(idx).map(|r| r.state))
    }

    /// Returns false when `idx` is out of range
    pub fn set_state(&mut self, idx: usize, state: State) -> bool {
        with_records!(self, records => match records.get_mut(idx) {
            Some(record) => {
                record.state = state;
                true
            }
            None => false,
        })
    }

    pub fn set_store_identity(&mut self, idx: usize, identity: StoreIdentity) -> bool {
        with_records!(self, records => match records.get_mut(idx) {
            Some(record) => {
                record.identity = identity;
                true
            }
            None => false,
        })
    }

    /// External representation of row `idx`
    pub fn string_at(&self, idx: usize) -> Option<String> {
        with_records!(self, records => records.get(idx).map(|r| r.to_external_string()))
    }

    /// Debug representation of row `idx`, including its state
    pub fn debug_string_at(&self, idx: usize) -> Option<String> {
        with_records!(self, records => records.get(idx).map(|r| r.to_debug_string()))
    }

    /// The `fields` object of row `idx` as sent to the store
    pub fn fields_at(&self, idx: usize) -> Option<Value> {
        with_records!(self, records => records.get(idx).map(|r| r.fields_value()))
    }

    pub fn find_by_base_id(&self, base_id: &str) -> Option<usize> {
        with_records!(self, records => records.iter().position(|r| r.base_id() == base_id))
    }

    /// Store identifier of the row whose forge identifier is `base_id`
    pub fn store_id_for(&self, base_id: &str) -> Option<&str> {
        self.find_by_base_id(base_id)
            .and_then(|idx| self.store_id_at(idx))
    }

    /// Forge identifier to store identifier, for every row already written.
    ///
    /// Like [`Table::store_id_for`], the first row carrying a forge id decides;
    /// later duplicates are ignored with a warning.
    pub fn store_ids_by_base_id(&self) -> HashMap<String, String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut ids = HashMap::new();
        for idx in 0..self.len() {
            let Some(base_id) = self.base_id_at(idx).filter(|id| !id.is_empty()) else {
                continue;
            };
            if !seen.insert(base_id) {
                warn!("Duplicate {} id '{}' at row {}, keeping the first", self.kind(), base_id, idx);
                continue;
            }
            if let Some(store_id) = self.store_id_at(idx) {
                ids.insert(base_id.to_string(), store_id.to_string());
            }
        }
        ids
    }

    /// Rewrite the relationship identifiers of row `idx`, see
    /// [`crate::records::Record::resolve_relationships`]
    pub fn resolve_relationships_at<R>(&mut self, idx: usize, resolve: R) -> usize
    where
        R: FnMut(TableKind, &str) -> Option<String>,
    {
        with_records!(self, records => records
            .get_mut(idx)
            .map(|r| r.resolve_relationships(resolve))
            .unwrap_or(0))
    }

    /// Move every row of `other` to the end of this table
    pub fn append_table(&mut self, other: Table) -> Result<()> {
        match (self, other) {
            (Table::Provider(rows), Table::Provider(mut more)) => rows.append(&mut more),
            (Table::Label(rows), Table::Label(mut more)) => rows.append(&mut more),
            (Table::Account(rows), Table::Account(mut more)) => rows.append(&mut more),
            (Table::Repository(rows), Table::Repository(mut more)) => rows.append(&mut more),
            (Table::Milestone(rows), Table::Milestone(mut more)) => rows.append(&mut more),
            (Table::Issue(rows), Table::Issue(mut more)) => rows.append(&mut more),
            (table, other) => anyhow::bail!(
                "Cannot append {} rows to the {} table",
                other.kind(),
                table.kind()
            ),
        }
        Ok(())
    }

    /// Append a row parsed from its external representation
    pub fn append_json(&mut self, value: Value) -> Result<()> {
        let kind = self.kind();
        with_records!(self, records => {
            let record = serde_json::from_value(value)
                .with_context(|| format!("Failed to parse {} record", kind))?;
            records.push(record);
        });
        Ok(())
    }
}
