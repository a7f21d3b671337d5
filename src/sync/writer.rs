//! Write path for a single new note.
//!
//! The coordinator tries the backend first; when the backend is
//! unreachable the note is persisted locally under a placeholder id and
//! flagged unsynced, for the reconciler's drain phase to deliver later.
//! Either way the caller observes a stored note and a fresh projection,
//! so an authoring action is never lost.

use crate::error::StoreError;
use crate::note::{Note, NoteDraft};
use crate::remote::Remote;
use crate::store::LocalStore;
use crate::sync::PROJECTION_LIMIT;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Generator for placeholder ids assigned to notes awaiting confirmation.
///
/// Seeded once from the wall clock in milliseconds, then strictly
/// incremented, so rapid successive offline writes cannot collide the way
/// raw timestamp ids would. Placeholders are replaced by server ids when
/// the drain phase confirms the note.
pub struct PlaceholderIds {
    next: AtomicI64,
}

impl PlaceholderIds {
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    pub fn next(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for PlaceholderIds {
    fn default() -> Self {
        Self::new()
    }
}

/// What the caller gets back from a create: the stored note (confirmed or
/// provisional) plus the refreshed projection.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResult {
    pub note: Note,
    pub recent: Vec<Note>,
}

/// Handles a single new-note creation.
pub struct WriteCoordinator {
    store: Arc<LocalStore>,
    remote: Arc<dyn Remote>,
    placeholder_ids: PlaceholderIds,
}

impl WriteCoordinator {
    pub fn new(store: Arc<LocalStore>, remote: Arc<dyn Remote>) -> Self {
        Self {
            store,
            remote,
            placeholder_ids: PlaceholderIds::new(),
        }
    }

    /// Create a note: confirmed remotely when possible, queued locally
    /// otherwise. Only a local storage fault is an error.
    pub async fn create(&self, draft: NoteDraft) -> Result<CreateResult, StoreError> {
        let note = match self.remote.create(&draft).await {
            Ok(mut created) => {
                created.is_synced = true;
                info!("note confirmed by server with id {}", created.id);
                created
            }
            Err(e) => {
                let placeholder = self.placeholder_ids.next();
                warn!(
                    "remote unavailable ({}), queueing note under placeholder id {}",
                    e, placeholder
                );
                draft.into_note(placeholder, false)
            }
        };

        self.store.put(&note)?;
        let recent = self.store.recent(PROJECTION_LIMIT);
        Ok(CreateResult { note, recent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_ids_are_strictly_increasing() {
        let ids = PlaceholderIds::new();
        let a = ids.next();
        let b = ids.next();
        let c = ids.next();
        assert!(a < b && b < c);
    }
}
