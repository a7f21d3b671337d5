//! Error types for the store, the remote client, and the sync cycle.

use thiserror::Error;

/// Errors from the embedded note store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("note serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors from the backend client. The sync engine treats every variant
/// uniformly as "remote unavailable".
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),
}

/// Errors surfaced by a reconciliation cycle.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("local store error: {0}")]
    Store(#[from] StoreError),

    /// The merge-and-replace transaction failed. The transaction rolls
    /// back, so the previous store contents are still intact, but the
    /// cycle's authoritative snapshot was not applied.
    #[error("failed to replace local store with authoritative snapshot: {0}")]
    Replace(#[source] StoreError),
}
