use anyhow::Result;
use colored::*;
use log::info;

use crate::tables::TableKind;

/// List every table in write order
pub fn tables_command() -> Result<()> {
    info!("Listing tables");

    println!("{}", "Tables (write order)".bold());
    println!("{}", "-".repeat(50));

    for kind in TableKind::ALL {
        let deps: Vec<&str> = kind.dependencies().into_iter().map(TableKind::name).collect();
        let deps = if deps.is_empty() {
            "-".dimmed().to_string()
        } else {
            deps.join(", ")
        };
        println!(
            "{:>2}  {:<12} depends on: {}",
            kind.index(),
            kind.name().green(),
            deps
        );

        for rel in kind.relationship_columns() {
            println!("      {} -> {}", rel.column.cyan(), rel.target);
        }
    }

    println!("\nTotal tables: {}", TableKind::ALL.len());
    Ok(())
}
