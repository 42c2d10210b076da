//! Shared application state for axum handlers.

use std::sync::Arc;

use manostat_app::ports::ReadingStore;
use manostat_app::snapshot::SnapshotRx;

/// Application state shared across all axum handlers.
///
/// Generic over the reading store to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone` —
/// only the `Arc` wrapper is cloned.
pub struct AppState<RS> {
    /// History query port.
    pub reading_store: Arc<RS>,
    /// Read side of the supervisor's snapshot channel.
    pub snapshot: SnapshotRx,
    /// Row count returned by the history endpoint.
    pub history_limit: u32,
}

impl<RS> Clone for AppState<RS> {
    fn clone(&self) -> Self {
        Self {
            reading_store: Arc::clone(&self.reading_store),
            snapshot: self.snapshot.clone(),
            history_limit: self.history_limit,
        }
    }
}

impl<RS> AppState<RS>
where
    RS: ReadingStore + Send + Sync + 'static,
{
    /// Create state with the default history window of 20 rows.
    pub fn new(reading_store: RS, snapshot: SnapshotRx) -> Self {
        Self {
            reading_store: Arc::new(reading_store),
            snapshot,
            history_limit: 20,
        }
    }

    /// Override the history window.
    #[must_use]
    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit;
        self
    }
}
