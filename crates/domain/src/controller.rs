//! Hysteresis controller — the pure actuator/alert decision.
//!
//! A Schmitt-trigger style two-threshold scheme: the actuator only changes
//! when pressure crosses the trip point for the *opposite* direction of its
//! last change. Inside the band the actuator is held, so in-band jitter can
//! never toggle it.

use serde::{Deserialize, Serialize};

use crate::reading::Reading;
use crate::thresholds::Thresholds;

/// Compressor actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorState {
    /// Compressor stopped.
    Off,
    /// Compressor running.
    On,
}

/// Alert level derived from the latest reading against the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Pressure inside the safe band.
    Normal,
    /// Under-pressure — risk of line stall.
    Low,
    /// Over-pressure — safety risk.
    High,
}

/// The paired `(actuator, alert)` state of the controller.
///
/// The two fields always change together through [`decide`]; consumers never
/// observe one without the other for a given decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    /// Current actuator command.
    pub actuator: ActuatorState,
    /// Current alert level.
    pub alert: AlertLevel,
}

impl ControlState {
    /// The configured startup state before any reading is processed.
    #[must_use]
    pub fn initial(actuator: ActuatorState) -> Self {
        Self {
            actuator,
            alert: AlertLevel::Normal,
        }
    }
}

/// Pure decision function: `(pressure, thresholds, state) → state`.
///
/// - `p < low` — alert Low; engage the compressor if it was off.
/// - `p > high` — alert High; disengage the compressor if it was on.
/// - in band — alert Normal; the actuator is held unchanged (hysteresis).
///
/// Infallible by construction: callers only pass finite pressures
/// ([`Reading`] rejects anything else at the edge).
#[must_use]
pub fn decide(pressure_bar: f64, thresholds: &Thresholds, current: ControlState) -> ControlState {
    if pressure_bar < thresholds.low() {
        ControlState {
            actuator: ActuatorState::On,
            alert: AlertLevel::Low,
        }
    } else if pressure_bar > thresholds.high() {
        ControlState {
            actuator: ActuatorState::Off,
            alert: AlertLevel::High,
        }
    } else {
        ControlState {
            actuator: current.actuator,
            alert: AlertLevel::Normal,
        }
    }
}

/// Stateful wrapper around [`decide`].
///
/// Owns the single authoritative copy of [`ActuatorState`]; every other
/// component observes it only through emitted events or snapshots.
#[derive(Debug, Clone)]
pub struct HysteresisController {
    thresholds: Thresholds,
    state: ControlState,
}

impl HysteresisController {
    /// Create a controller with the configured startup state.
    #[must_use]
    pub fn new(thresholds: Thresholds, initial: ControlState) -> Self {
        Self {
            thresholds,
            state: initial,
        }
    }

    /// Current `(actuator, alert)` pair.
    #[must_use]
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// The configured band.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Process one reading.
    ///
    /// Returns `Some(new_state)` only when the decision changed either the
    /// actuator or the alert level — exactly the condition under which an
    /// `AlertTransition` event must be emitted. In-band readings that hold
    /// the previous state return `None`.
    pub fn observe(&mut self, reading: &Reading) -> Option<ControlState> {
        let next = decide(reading.pressure_bar, &self.thresholds, self.state);
        if next == self.state {
            None
        } else {
            self.state = next;
            Some(next)
        }
    }
}
