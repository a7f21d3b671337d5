//! Command-line argument types for the sync daemon.

use clap::Parser;

/// Arguments for `care-syncd`, the periodic sync daemon.
#[derive(Parser, Debug)]
#[command(name = "care-syncd", about = "Periodic care-note synchronization daemon")]
pub struct SyncdArgs {
    /// Base URL of the care-notes backend
    #[arg(long, env = "CARE_SYNC_SERVER", default_value = "http://localhost:3001/api")]
    pub server: String,

    /// Path to the local note database
    #[arg(long, env = "CARE_SYNC_DB", default_value = "care-notes.redb")]
    pub db: String,

    /// Seconds between sync cycles
    #[arg(long, default_value_t = 60)]
    pub interval: u64,
}
