//! Thread-safe snapshot of the current supervision state.
//!
//! External readers (the HTTP API) never poll the controller directly —
//! they read this snapshot, which only the supervisor writes. Backed by a
//! `tokio::sync::watch` pair, so readers always see the latest value
//! without locking producers.

use serde::Serialize;
use tokio::sync::watch;

use manostat_domain::controller::{ActuatorState, AlertLevel, ControlState};
use manostat_domain::reading::Reading;
use manostat_domain::time::Timestamp;

/// The latest observable state of the plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    /// Last accepted pressure in bar. `None` before the first reading.
    pub pressure_bar: Option<f64>,
    /// Alert level from the last controller decision.
    pub alert: AlertLevel,
    /// Actuator command from the last controller decision.
    pub actuator: ActuatorState,
    /// True when a transport error or bus overflow occurred since the last
    /// good reading — the values above may no longer match reality.
    pub stale: bool,
    /// When the last accepted reading was taken.
    pub updated_at: Option<Timestamp>,
}

impl StatusSnapshot {
    fn initial(state: ControlState) -> Self {
        Self {
            pressure_bar: None,
            alert: state.alert,
            actuator: state.actuator,
            // Nothing has been observed yet, so the state is unconfirmed.
            stale: true,
            updated_at: None,
        }
    }
}

/// Create a snapshot channel seeded with the configured startup state.
#[must_use]
pub fn channel(initial: ControlState) -> (SnapshotTx, SnapshotRx) {
    let (tx, rx) = watch::channel(StatusSnapshot::initial(initial));
    (SnapshotTx { tx }, SnapshotRx { rx })
}

/// Writer half — owned by the supervisor, the single writer.
pub struct SnapshotTx {
    tx: watch::Sender<StatusSnapshot>,
}

impl SnapshotTx {
    /// Record an accepted reading and the (possibly unchanged) decision.
    ///
    /// Clears the stale flag: the state is confirmed again.
    pub fn reading_accepted(&self, reading: &Reading, state: ControlState) {
        self.tx.send_modify(|snap| {
            snap.pressure_bar = Some(reading.pressure_bar);
            snap.alert = state.alert;
            snap.actuator = state.actuator;
            snap.stale = false;
            snap.updated_at = Some(reading.at);
        });
    }

    /// Flag the snapshot as stale, keeping the last known values.
    pub fn mark_stale(&self) {
        self.tx.send_modify(|snap| snap.stale = true);
    }
}

/// Reader half — cheap to clone, one per consumer.
#[derive(Clone)]
pub struct SnapshotRx {
    rx: watch::Receiver<StatusSnapshot>,
}

impl SnapshotRx {
    /// The latest snapshot.
    #[must_use]
    pub fn current(&self) -> StatusSnapshot {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial_state() -> ControlState {
        ControlState::initial(ActuatorState::Off)
    }

    #[test]
    fn should_start_stale_with_no_pressure() {
        let (_tx, rx) = channel(initial_state());
        let snap = rx.current();
        assert!(snap.stale);
        assert!(snap.pressure_bar.is_none());
        assert_eq!(snap.actuator, ActuatorState::Off);
    }

    #[test]
    fn should_clear_stale_on_accepted_reading() {
        let (tx, rx) = channel(initial_state());
        let reading = Reading::new(8.0).unwrap();
        tx.reading_accepted(&reading, initial_state());

        let snap = rx.current();
        assert!(!snap.stale);
        assert_eq!(snap.pressure_bar, Some(8.0));
        assert_eq!(snap.updated_at, Some(reading.at));
    }

    #[test]
    fn should_keep_last_values_when_marked_stale() {
        let (tx, rx) = channel(initial_state());
        let reading = Reading::new(7.5).unwrap();
        tx.reading_accepted(&reading, initial_state());
        tx.mark_stale();

        let snap = rx.current();
        assert!(snap.stale);
        assert_eq!(snap.pressure_bar, Some(7.5));
    }

    #[test]
    fn should_share_updates_across_cloned_readers() {
        let (tx, rx) = channel(initial_state());
        let other = rx.clone();
        tx.reading_accepted(&Reading::new(9.1).unwrap(), initial_state());
        assert_eq!(other.current().pressure_bar, Some(9.1));
    }
}
