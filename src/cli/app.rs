use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge-tables")]
#[command(about = "Inspect forge metadata tables and dry-run their write-out to a table store")]
pub struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tables in write order with their dependencies and columns
    Tables,
    /// Resolve a table name to its registry slot
    Lookup {
        /// Lowercase table name, e.g. "repository"
        name: String,
    },
    /// Print every record of a snapshot file
    Render {
        /// JSON object keyed by table name
        snapshot: PathBuf,
        /// Include the internal sync state of each record
        #[arg(short, long)]
        debug: bool,
    },
    /// Write a snapshot into an in-memory store, in dependency order
    Sync {
        /// JSON object keyed by table name
        snapshot: PathBuf,
    },
}
