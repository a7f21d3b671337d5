//! Persistent note store backed by an embedded redb database.
//!
//! One table, keyed by the note's logical id (server id when known,
//! placeholder id otherwise), values JSON-serialized notes. Keying by the
//! logical id means re-saving the same note overwrites rather than
//! duplicates it.
//!
//! Read paths fail soft: a storage fault yields an empty result and a
//! warning, so callers stay live. Write paths return hard errors, because
//! the reconciler must abort rather than continue over a half-applied
//! snapshot.

use crate::error::StoreError;
use crate::note::Note;
use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

const NOTES: TableDefinition<i64, &[u8]> = TableDefinition::new("notes");

/// Durable, keyed document storage for notes.
pub struct LocalStore {
    db: Database,
}

/// Diagnostic aggregate over the full store contents.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    pub total_notes: usize,
    pub unique_residents: usize,
    pub unique_authors: usize,
    pub oldest_note: Option<DateTime<Utc>>,
    pub newest_note: Option<DateTime<Utc>>,
}

impl LocalStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        // Ensure the table exists so read transactions never race creation.
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(NOTES)?;
        }
        txn.commit()?;

        Ok(Self { db })
    }

    /// All stored notes, optionally restricted to those not yet accepted
    /// by the backend. Returns empty on storage fault.
    pub fn get_all(&self, unsynced_only: bool) -> Vec<Note> {
        match self.read_all() {
            Ok(mut notes) => {
                if unsynced_only {
                    notes.retain(|n| !n.is_synced);
                }
                notes
            }
            Err(e) => {
                warn!("failed to read notes from local store: {}", e);
                Vec::new()
            }
        }
    }

    /// Idempotent upsert keyed by the note's id. Last write wins.
    pub fn put(&self, note: &Note) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NOTES)?;
            let bytes = serde_json::to_vec(note)?;
            table.insert(note.id, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Delete every stored record.
    ///
    /// Only meaningful as the precursor to an authoritative rewrite;
    /// callers must immediately follow with the upstream snapshot (or use
    /// [`merge_replace`](Self::merge_replace), which does both atomically).
    pub fn remove_all(&self) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        txn.delete_table(NOTES)?;
        {
            let _ = txn.open_table(NOTES)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Atomically swap the store contents for `pulled` plus every stored
    /// record whose id is absent from `pulled`.
    ///
    /// Snapshot, drop, and refill all happen inside one write transaction:
    /// a concurrent `put` either commits before the transaction opens (and
    /// lands in the kept set) or is serialized after it (and survives the
    /// swap untouched) — redb admits a single writer at a time. A fault
    /// rolls the whole swap back, and readers never observe the
    /// intermediate empty store.
    ///
    /// A note absent from `pulled` survives regardless of its sync flag,
    /// so upstream deletions do not propagate and the store only grows
    /// until the server's list covers it again.
    pub fn merge_replace(&self, pulled: &[Note]) -> Result<(), StoreError> {
        let pulled_ids: HashSet<i64> = pulled.iter().map(|n| n.id).collect();

        let txn = self.db.begin_write()?;
        let local_only: Vec<Note> = {
            let table = txn.open_table(NOTES)?;
            let mut kept = Vec::new();
            for entry in table.iter()? {
                let (_, value) = entry?;
                let note: Note = serde_json::from_slice(value.value())?;
                if !pulled_ids.contains(&note.id) {
                    kept.push(note);
                }
            }
            kept
        };
        txn.delete_table(NOTES)?;
        {
            let mut table = txn.open_table(NOTES)?;
            for note in pulled.iter().chain(local_only.iter()) {
                let bytes = serde_json::to_vec(note)?;
                table.insert(note.id, bytes.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Fold a placeholder-identified note into its confirmed server
    /// identity: the placeholder record is removed and the confirmed note
    /// inserted in one write transaction, so no intermediate state exists
    /// where the note sits under the server id still flagged unsynced.
    pub fn confirm(&self, placeholder_id: i64, confirmed: &Note) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NOTES)?;
            table.remove(placeholder_id)?;
            let bytes = serde_json::to_vec(confirmed)?;
            table.insert(confirmed.id, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Notes sorted by authoring time descending, truncated to `limit`.
    /// Returns empty on storage fault.
    pub fn recent(&self, limit: usize) -> Vec<Note> {
        let mut notes = self.get_all(false);
        notes.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        notes.truncate(limit);
        notes
    }

    /// Re-key the record stored under `old_id` to `new_id`, rewriting the
    /// note's own id field to match. Used to fold a placeholder-identified
    /// note into its confirmed server identity.
    pub fn rewrite_id(&self, old_id: i64, new_id: i64) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NOTES)?;
            let existing = match table.remove(old_id)? {
                Some(guard) => {
                    let mut note: Note = serde_json::from_slice(guard.value())?;
                    note.id = new_id;
                    Some(note)
                }
                None => None,
            };
            if let Some(note) = existing {
                let bytes = serde_json::to_vec(&note)?;
                table.insert(new_id, bytes.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Aggregate counts over the store. Returns zeroed stats on fault.
    pub fn stats(&self) -> StoreStats {
        let notes = self.get_all(false);

        let mut residents = HashSet::new();
        let mut authors = HashSet::new();
        let mut oldest: Option<DateTime<Utc>> = None;
        let mut newest: Option<DateTime<Utc>> = None;
        for note in &notes {
            residents.insert(note.resident_name.as_str());
            authors.insert(note.author_name.as_str());
            if oldest.map_or(true, |t| note.date_time < t) {
                oldest = Some(note.date_time);
            }
            if newest.map_or(true, |t| note.date_time > t) {
                newest = Some(note.date_time);
            }
        }

        StoreStats {
            total_notes: notes.len(),
            unique_residents: residents.len(),
            unique_authors: authors.len(),
            oldest_note: oldest,
            newest_note: newest,
        }
    }

    fn read_all(&self) -> Result<Vec<Note>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(NOTES)?;
        let mut notes = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let note: Note = serde_json::from_slice(value.value())?;
            notes.push(note);
        }
        Ok(notes)
    }
}
