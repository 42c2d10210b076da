//! Reading — a single timestamped pressure sample.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::time::{self, Timestamp};

/// An immutable pressure sample in bar.
///
/// Readings are produced only by the telemetry channel or the plant model.
/// The constructor rejects NaN and infinite values, so the controller never
/// has to handle them — malformed telemetry is reported as a transport
/// error at the edge and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Pressure in bar.
    pub pressure_bar: f64,
    /// When the sample was taken (UTC).
    pub at: Timestamp,
}

impl Reading {
    /// Create a reading taken now.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFiniteReading`] if `pressure_bar` is NaN or
    /// infinite.
    pub fn new(pressure_bar: f64) -> Result<Self, DomainError> {
        Self::at(pressure_bar, time::now())
    }

    /// Create a reading with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFiniteReading`] if `pressure_bar` is NaN or
    /// infinite.
    pub fn at(pressure_bar: f64, at: Timestamp) -> Result<Self, DomainError> {
        if pressure_bar.is_finite() {
            Ok(Self { pressure_bar, at })
        } else {
            Err(DomainError::NonFiniteReading { value: pressure_bar })
        }
    }
}
