//! care-syncd: run the reconciliation cycle on a fixed interval.
//!
//! Usage:
//!   care-syncd --server http://localhost:3001/api --db care-notes.redb
//!   care-syncd --interval 30

use care_sync::cli::SyncdArgs;
use care_sync::{HttpRemote, LocalStore, Outcome, Reconciler, SyncState};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = SyncdArgs::parse();

    let store = Arc::new(LocalStore::open(&args.db)?);
    let remote = Arc::new(HttpRemote::new(&args.server));
    let reconciler = Reconciler::new(store, remote);

    info!(
        "syncing against {} every {}s (db: {})",
        args.server, args.interval, args.db
    );

    let mut ticker = interval(Duration::from_secs(args.interval));
    // A tick missed while a cycle is running is not queued up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut state = SyncState::new();
    loop {
        ticker.tick().await;
        state.resolve(Outcome::Pending);
        let report = reconciler.sync().await;
        let offline = report.offline;
        state.resolve(Outcome::Succeeded(report));
        match (&state.error, offline) {
            (Some(msg), true) => info!("cycle finished offline: {}", msg),
            (Some(msg), false) => error!("cycle failed: {}", msg),
            (None, _) => info!(
                "cycle ok, {} note(s) in projection at {:?}",
                state.notes.len(),
                state.last_sync
            ),
        }
    }
}
