//! Telemetry ingest configuration.

use serde::Deserialize;

/// Configuration for the MQTT telemetry channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Topic carrying pressure payloads.
    pub topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// How long to wait for the initial subscription to be acknowledged
    /// before aborting startup, in seconds.
    pub connect_timeout_secs: u16,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "manostat".to_string(),
            topic: "sensor/pressao".to_string(),
            keep_alive_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}
