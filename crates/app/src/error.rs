//! Errors crossing port boundaries.

/// Failure reported by a driven adapter through a port trait.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The persistent store failed.
    #[error("storage failure")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure of the auxiliary (weather) collaborator.
///
/// Always isolated: it is reported as an event and never reaches the
/// control path.
#[derive(Debug, thiserror::Error)]
#[error("auxiliary fetch failed: {message}")]
pub struct AuxiliaryFetchError {
    /// Human-readable cause.
    pub message: String,
}

impl AuxiliaryFetchError {
    /// Build from any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self {
            message: cause.to_string(),
        }
    }
}
