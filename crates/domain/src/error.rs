//! Domain error types.

/// Errors raised by domain constructors and validation.
///
/// The decision function itself is infallible — values that would make it
/// misbehave (NaN, infinite, inverted thresholds) are rejected at the edges,
/// before they can reach it.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// A pressure value was NaN or infinite.
    #[error("pressure reading is not finite: {value}")]
    NonFiniteReading {
        /// The offending value.
        value: f64,
    },

    /// Threshold configuration where `low >= high` or either bound is not finite.
    #[error("invalid thresholds: low {low} must be finite and below high {high}")]
    InvalidThresholds {
        /// Configured lower trip point.
        low: f64,
        /// Configured upper trip point.
        high: f64,
    },

    /// A physical rate parameter (gain, drain, time step) was negative or not finite.
    #[error("invalid plant parameter {name}: {value}")]
    InvalidPlantParameter {
        /// Parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}
