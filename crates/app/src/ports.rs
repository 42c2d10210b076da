//! Port traits — the seams between the application core and its adapters.

use std::future::Future;

use serde::Serialize;

use manostat_domain::event::Event;
use manostat_domain::reading::Reading;

use crate::error::{AppError, AuxiliaryFetchError};

/// Publishes events to all current subscribers.
///
/// `publish` must never block the calling producer and must return
/// immediately; slow consumers are handled by the bus itself (drop-oldest
/// with an observable drop signal), never by back-pressure on producers.
pub trait EventPublisher {
    /// Publish an event. Succeeds even with zero subscribers.
    fn publish(&self, event: Event);
}

impl<T: EventPublisher> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) {
        (**self).publish(event);
    }
}

/// A persisted reading as exposed by the history query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredReading {
    /// Pressure in bar.
    pub pressure: f64,
    /// Wall-clock timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

/// Append-only persistence of accepted readings.
pub trait ReadingStore {
    /// Insert one row for an accepted reading.
    fn record(&self, reading: &Reading) -> impl Future<Output = Result<(), AppError>> + Send;

    /// The most recent `limit` readings, newest first.
    fn recent(&self, limit: u32)
    -> impl Future<Output = Result<Vec<StoredReading>, AppError>> + Send;
}

impl<T: ReadingStore + Sync> ReadingStore for std::sync::Arc<T> {
    fn record(&self, reading: &Reading) -> impl Future<Output = Result<(), AppError>> + Send {
        (**self).record(reading)
    }

    fn recent(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<StoredReading>, AppError>> + Send {
        (**self).recent(limit)
    }
}

/// Low-priority auxiliary data source (weather).
///
/// Implementations own their request timeout; the poller only spaces calls
/// out and converts outcomes into events.
pub trait AuxiliaryProvider {
    /// Fetch one auxiliary snapshot as a JSON payload.
    fn fetch(
        &self,
    ) -> impl Future<Output = Result<serde_json::Value, AuxiliaryFetchError>> + Send;
}
