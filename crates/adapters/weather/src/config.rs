//! Weather collaborator configuration.

use serde::Deserialize;

/// Configuration for the OpenWeatherMap lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Empty disables the poller.
    pub api_key: String,
    /// Site latitude.
    pub latitude: f64,
    /// Site longitude.
    pub longitude: f64,
    /// Unit system passed to the API.
    pub units: String,
    /// Response language.
    pub lang: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u16,
    /// Seconds between polls.
    pub poll_interval_secs: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            // Distrito Industrial I, Manaus — the site the network serves.
            latitude: -3.110_193,
            longitude: -59.954_852,
            units: "metric".to_string(),
            lang: "pt".to_string(),
            timeout_secs: 10,
            poll_interval_secs: 300,
        }
    }
}

impl WeatherConfig {
    /// True when an API key is configured.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}
