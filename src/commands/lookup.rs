use anyhow::Result;
use log::{info, warn};

use crate::tables::{TableKind, lookup};

/// Print the registry slot for `name`, failing when the name is unknown
pub fn lookup_command(name: &str) -> Result<()> {
    info!("Looking up table: {}", name);

    match lookup(name) {
        Some(index) => {
            println!("{} -> {}", name, index);
            Ok(())
        }
        None => {
            warn!("Unknown table name: {}", name);
            let known: Vec<&str> = TableKind::ALL.iter().map(|kind| kind.name()).collect();
            anyhow::bail!("Unknown table '{}'. Known tables: {}", name, known.join(", "))
        }
    }
}
