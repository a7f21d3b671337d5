//! Offline-first synchronization engine for caregiver notes.
//!
//! A device keeps a local replica of care notes in an embedded [`redb`]
//! database and reconciles it against an authoritative backend whenever the
//! network allows. New notes are written through the [`sync::WriteCoordinator`],
//! which confirms them remotely when it can and queues them locally when it
//! can't; the [`sync::Reconciler`] later drains the queue, pulls the server's
//! note set, and rewrites the local store so that the server wins for
//! everything it has seen and local-only notes survive untouched.

pub mod cli;
pub mod error;
pub mod note;
pub mod remote;
pub mod store;
pub mod sync;

pub use error::{RemoteError, StoreError, SyncError};
pub use note::{Note, NoteDraft};
pub use remote::{HttpRemote, Remote};
pub use store::{LocalStore, StoreStats};
pub use sync::{CreateResult, Outcome, Reconciler, SyncReport, SyncState, WriteCoordinator};
