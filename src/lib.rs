//! Typed records and a dependency-ordered table registry for mirroring
//! software-forge metadata into an external table store.

pub mod commands;
pub mod config;
pub mod records;
pub mod sink;
pub mod tables;

pub use records::{Base, Record, RecordFields, State, StoreIdentity};
pub use sink::{MemorySink, RecordSink, WriteReport, write_in_order};
pub use tables::{NUM_TABLES, Registry, Table, TableKind, lookup, lookup_kind};
