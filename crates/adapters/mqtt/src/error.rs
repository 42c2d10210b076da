//! MQTT adapter error types.

/// Errors raised while establishing the telemetry subscription.
///
/// These are the only fatal errors in the system: a supervisor that cannot
/// hear its sensor must abort startup rather than run silently degraded.
/// Everything after startup is reported as `TransportError` events instead.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The subscribe request could not be queued.
    #[error("failed to request subscription to {topic}")]
    Subscribe {
        /// The configured topic.
        topic: String,
        /// Underlying client error.
        #[source]
        source: rumqttc::ClientError,
    },

    /// The broker connection failed before the subscription was acknowledged.
    #[error("broker connection failed during startup")]
    Connect(#[source] rumqttc::ConnectionError),

    /// The broker did not acknowledge the subscription in time.
    #[error("subscription to {topic} not acknowledged within {timeout_secs}s")]
    SubscribeTimeout {
        /// The configured topic.
        topic: String,
        /// The configured startup timeout.
        timeout_secs: u16,
    },
}
