//! Thresholds — the two trip points of the hysteresis band.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The safe operating band `[low, high]` in bar.
///
/// Configured once at startup and read-only thereafter. `low` is the rising
/// trip point (compressor engages below it), `high` the falling trip point
/// (compressor disengages above it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    low: f64,
    high: f64,
}

impl Thresholds {
    /// Build a validated threshold pair.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidThresholds`] unless both bounds are
    /// finite and `low < high`.
    pub fn new(low: f64, high: f64) -> Result<Self, DomainError> {
        if low.is_finite() && high.is_finite() && low < high {
            Ok(Self { low, high })
        } else {
            Err(DomainError::InvalidThresholds { low, high })
        }
    }

    /// The lower trip point in bar.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// The upper trip point in bar.
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }
}
