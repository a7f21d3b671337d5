//! The synchronization engine: write path, reconciliation cycle, and the
//! state types handed to the presentation layer.

pub mod reconciler;
pub mod state;
pub mod writer;

pub use reconciler::Reconciler;
pub use state::{Outcome, SyncReport, SyncState};
pub use writer::{CreateResult, WriteCoordinator};

/// How many notes the outward projection carries, most recent first.
pub(crate) const PROJECTION_LIMIT: usize = 5;
