use anyhow::Result;
use colored::*;
use log::info;
use std::path::Path;

use super::load_snapshot_file;

/// Print each record of a snapshot, table by table in write order
pub fn render_command(snapshot: &Path, debug: bool) -> Result<()> {
    info!("Rendering snapshot {:?} (debug: {})", snapshot, debug);

    let registry = load_snapshot_file(snapshot)?;

    for (kind, table) in registry.iter_in_order() {
        if table.is_empty() {
            continue;
        }

        println!("{} ({})", kind.name().bold(), table.len());
        for idx in 0..table.len() {
            let line = if debug {
                table.debug_string_at(idx)
            } else {
                table.string_at(idx)
            };
            println!("  {}", line.unwrap_or_default());
        }
    }

    println!("\nTotal records: {}", registry.len_total());
    Ok(())
}
