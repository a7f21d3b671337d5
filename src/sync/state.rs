//! Presentation-facing sync state.
//!
//! The engine never pushes into UI machinery; every operation resolves to
//! a plain value ([`SyncReport`] or [`Outcome`]) and whatever owns the UI
//! state folds it into a [`SyncState`]. No global singleton.

use crate::note::Note;
use chrono::{DateTime, Utc};

/// The result of one reconciliation cycle, as exposed to the presentation
/// layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// The recent-notes projection, at most five, newest first.
    pub notes: Vec<Note>,
    /// When the cycle finished.
    pub synced_at: DateTime<Utc>,
    /// True when the pull phase failed and local contents were served as-is.
    pub offline: bool,
    /// Human-readable description of what went wrong, if anything.
    pub error: Option<String>,
}

/// Tagged three-phase outcome for an async operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Pending,
    Succeeded(T),
    Failed(String),
}

/// The container the presentation layer keeps between operations.
///
/// Consumed, not owned, by the engine: callers apply reports to it and
/// render from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncState {
    pub notes: Vec<Note>,
    pub loading: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// An operation started; clear any stale error.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Fold a finished cycle's report into the container.
    pub fn apply(&mut self, report: SyncReport) {
        self.loading = false;
        self.notes = report.notes;
        self.last_sync = Some(report.synced_at);
        self.error = report.error;
    }

    /// An operation failed outright.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Fold a tagged operation outcome into the container: pending marks
    /// loading, success applies the report, failure records the message.
    pub fn resolve(&mut self, outcome: Outcome<SyncReport>) {
        match outcome {
            Outcome::Pending => self.begin(),
            Outcome::Succeeded(report) => self.apply(report),
            Outcome::Failed(message) => self.fail(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(offline: bool) -> SyncReport {
        SyncReport {
            notes: Vec::new(),
            synced_at: Utc::now(),
            offline,
            error: offline.then(|| "working offline".to_string()),
        }
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut state = SyncState::new();
        state.fail("boom");
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.begin();
        assert!(state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn apply_records_sync_time_and_error() {
        let mut state = SyncState::new();
        state.begin();
        state.apply(report(true));
        assert!(!state.loading);
        assert!(state.last_sync.is_some());
        assert_eq!(state.error.as_deref(), Some("working offline"));

        state.begin();
        state.apply(report(false));
        assert!(state.error.is_none());
    }

    #[test]
    fn resolve_walks_the_three_phases() {
        let mut state = SyncState::new();

        state.resolve(Outcome::Pending);
        assert!(state.loading);
        assert!(state.error.is_none());

        state.resolve(Outcome::Succeeded(report(false)));
        assert!(!state.loading);
        assert!(state.last_sync.is_some());
        assert!(state.error.is_none());

        state.resolve(Outcome::Pending);
        state.resolve(Outcome::Failed("store unavailable".to_string()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("store unavailable"));
        // The last good projection and sync time survive a failure.
        assert!(state.last_sync.is_some());
    }
}
