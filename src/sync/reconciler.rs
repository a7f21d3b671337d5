//! The reconciliation cycle: drain queued notes to the backend, pull the
//! authoritative note set, and rewrite the local store so the server wins
//! for everything it has seen while local-only notes survive.

use crate::error::SyncError;
use crate::note::Note;
use crate::remote::Remote;
use crate::store::LocalStore;
use crate::sync::state::SyncReport;
use crate::sync::PROJECTION_LIMIT;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Runs the full sync cycle against the local store and the backend.
///
/// Cycles are exclusive and non-reentrant: a second caller waits for the
/// running cycle to finish rather than interleaving with it. An in-flight
/// cycle has no cancellation; callers stop scheduling future cycles
/// instead.
pub struct Reconciler {
    store: Arc<LocalStore>,
    remote: Arc<dyn Remote>,
    cycle_guard: Mutex<()>,
}

impl Reconciler {
    pub fn new(store: Arc<LocalStore>, remote: Arc<dyn Remote>) -> Self {
        Self {
            store,
            remote,
            cycle_guard: Mutex::new(()),
        }
    }

    /// Run one reconciliation cycle. Always resolves to a report; failures
    /// are carried in the report's `error` field, never propagated.
    pub async fn sync(&self) -> SyncReport {
        let _exclusive = self.cycle_guard.lock().await;

        match self.cycle().await {
            Ok(report) => report,
            Err(e) => {
                warn!("sync cycle aborted: {}", e);
                SyncReport {
                    notes: self.store.recent(PROJECTION_LIMIT),
                    synced_at: Utc::now(),
                    offline: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn cycle(&self) -> Result<SyncReport, SyncError> {
        self.drain().await?;

        // Pull the authoritative set; if the backend is unreachable, serve
        // the local contents as-is and tag the cycle offline.
        let pulled = match self.remote.list().await {
            Ok(notes) => notes,
            Err(e) => {
                info!("pull failed ({}), serving local notes offline", e);
                return Ok(SyncReport {
                    notes: self.store.recent(PROJECTION_LIMIT),
                    synced_at: Utc::now(),
                    offline: true,
                    error: Some(format!("working offline: {}", e)),
                });
            }
        };

        self.merge_and_replace(pulled)?;

        Ok(SyncReport {
            notes: self.store.recent(PROJECTION_LIMIT),
            synced_at: Utc::now(),
            offline: false,
            error: None,
        })
    }

    /// Deliver queued unsynced notes, best-effort per note: a rejected
    /// note stays queued for the next cycle, a confirmed one is folded
    /// into its server identity.
    async fn drain(&self) -> Result<(), SyncError> {
        let pending = self.store.get_all(true);
        if pending.is_empty() {
            return Ok(());
        }
        info!("draining {} queued note(s)", pending.len());

        for note in pending {
            match self.remote.create(&note.to_draft()).await {
                Ok(mut confirmed) => {
                    confirmed.is_synced = true;
                    self.store.confirm(note.id, &confirmed)?;
                    debug!(
                        "queued note {} confirmed under server id {}",
                        note.id, confirmed.id
                    );
                }
                Err(e) => {
                    warn!("failed to deliver queued note {}: {}", note.id, e);
                }
            }
        }
        Ok(())
    }

    /// Replace the store with `pulled ∪ local_only` in one transaction.
    ///
    /// Pulled notes are confirmed by definition; local-only notes (ids
    /// absent from the pull) keep their flags, so a queued note stays
    /// queued and a synced note the server no longer returns is retained.
    /// The local-only snapshot is taken inside the store's write
    /// transaction, never outside it: a `put` racing the cycle either
    /// commits first and lands in the kept set, or commits after the swap
    /// and survives it.
    fn merge_and_replace(&self, pulled: Vec<Note>) -> Result<(), SyncError> {
        let confirmed: Vec<Note> = pulled
            .into_iter()
            .map(|mut n| {
                n.is_synced = true;
                n
            })
            .collect();

        self.store
            .merge_replace(&confirmed)
            .map_err(SyncError::Replace)?;

        debug!(
            "local store merged with {} pulled note(s)",
            confirmed.len()
        );
        Ok(())
    }
}
