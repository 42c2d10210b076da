//! Payload decoding — raw broker bytes into a pressure value.
//!
//! The wire format is a UTF-8 decimal ASCII string, one payload per
//! reading (e.g. `"7.3"`). A malformed payload never crashes the ingest
//! task; it becomes a `TransportError` event and the reading is dropped.

/// Why a payload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    NotUtf8(#[source] std::str::Utf8Error),

    /// The payload does not parse as a decimal number.
    #[error("payload {payload:?} is not a pressure value")]
    NotANumber {
        /// The payload text, for diagnostics.
        payload: String,
    },

    /// The payload parsed but is NaN or infinite.
    ///
    /// Rejected here so non-finite values can never reach the controller.
    #[error("payload parsed to a non-finite value: {value}")]
    NonFinite {
        /// The parsed value.
        value: f64,
    },
}

/// Decode one payload into a finite pressure value in bar.
///
/// Surrounding ASCII whitespace is tolerated, matching what field sensors
/// actually send.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first problem found.
pub fn decode_payload(payload: &[u8]) -> Result<f64, DecodeError> {
    let text = std::str::from_utf8(payload).map_err(DecodeError::NotUtf8)?;
    let trimmed = text.trim();
    let value: f64 = trimmed.parse().map_err(|_| DecodeError::NotANumber {
        payload: trimmed.to_string(),
    })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DecodeError::NonFinite { value })
    }
}
