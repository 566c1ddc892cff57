//! Handlers behind the `forge-tables` subcommands

mod lookup;
mod render;
mod sync;
mod tables;

pub use lookup::lookup_command;
pub use render::render_command;
pub use sync::sync_command;
pub use tables::tables_command;

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

use crate::tables::Registry;

/// Read a snapshot file into a fresh registry
pub fn load_snapshot_file(path: &Path) -> Result<Registry> {
    debug!("Reading snapshot from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {:?}", path))?;
    let snapshot: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot file: {:?}", path))?;

    let mut registry = Registry::new();
    registry.load_snapshot(&snapshot)?;
    Ok(registry)
}
