//! Event — the tagged union carried by the event bus.
//!
//! Events are immutable value objects; once published they are never
//! mutated. Every event carries its own timestamp, independent of when a
//! consumer drains it.

use serde::{Deserialize, Serialize};

use crate::controller::{ActuatorState, AlertLevel};
use crate::reading::Reading;
use crate::time::{self, Timestamp};

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A new pressure sample was accepted.
    ReadingUpdate(Reading),
    /// The controller changed its `(actuator, alert)` pair.
    ///
    /// The two fields come from the same decision and are never emitted
    /// separately.
    AlertTransition {
        /// New alert level.
        alert: AlertLevel,
        /// New actuator command.
        actuator: ActuatorState,
    },
    /// Telemetry could not be decoded or the transport failed.
    ///
    /// The controller holds its last known state; no decision is made.
    TransportError {
        /// Human-readable cause.
        message: String,
    },
    /// A fresh auxiliary (weather) snapshot.
    AuxiliaryUpdate(serde_json::Value),
    /// The auxiliary fetch failed. Isolated from the control path.
    AuxiliaryFetchFailed {
        /// Human-readable cause.
        message: String,
    },
    /// A slow consumer fell behind and the bus evicted its oldest events.
    ///
    /// Emitted in-stream to the lagging consumer so it can flag staleness.
    EventsDropped {
        /// Number of events lost for that consumer.
        count: u64,
    },
}

/// A timestamped [`EventKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// When it happened (UTC).
    pub at: Timestamp,
}

impl Event {
    /// Wrap a kind with the current time.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            at: time::now(),
        }
    }

    /// True for events a consumer must treat as a staleness marker —
    /// the last rendered alert state may no longer match reality.
    #[must_use]
    pub fn marks_stale(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TransportError { .. } | EventKind::EventsDropped { .. }
        )
    }
}
