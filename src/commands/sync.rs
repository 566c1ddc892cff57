use anyhow::Result;
use colored::*;
use log::info;
use std::path::Path;

use super::load_snapshot_file;
use crate::config::Config;
use crate::sink::{MemorySink, write_in_order};

/// Dry-run the write-out of a snapshot against an in-memory store
pub async fn sync_command(config: &Config, snapshot: &Path) -> Result<()> {
    let kinds = config.enabled_kinds()?;
    info!("Dry-run sync of {:?} for {} tables", snapshot, kinds.len());

    let mut registry = load_snapshot_file(snapshot)?;
    let sink = MemorySink::new();
    let seeded = sink.seed_registry(&registry)?;
    if seeded > 0 {
        info!("Seeded in-memory store with {} already identified records", seeded);
    }

    let report = write_in_order(&mut registry, &sink, &kinds).await?;

    println!("{:<12} {:>8} {:>8} {:>8}", "Table", "Created", "Updated", "Skipped");
    println!("{}", "-".repeat(40));
    for table in &report.tables {
        println!(
            "{:<12} {:>8} {:>8} {:>8}",
            table.kind.name(),
            table.created,
            table.updated,
            table.skipped
        );
    }

    println!(
        "\n{} {} created, {} updated, {} skipped",
        "✓".green(),
        report.created(),
        report.updated(),
        report.skipped()
    );
    Ok(())
}
