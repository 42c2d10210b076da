//! # manostat-adapter-weather
//!
//! Weather adapter — implements the [`AuxiliaryProvider`] port against
//! OpenWeatherMap.
//!
//! ## Responsibilities
//! - One GET per poll with coordinates and API key, bounded by a
//!   per-request timeout
//! - Consume `main.temp`, `weather[0].description`, `weather[0].icon`
//! - Resolve the icon to its fixed image URL so consumers need no
//!   knowledge of the upstream URL scheme
//!
//! Failures stay inside the port contract ([`AuxiliaryFetchError`]) and are
//! isolated from the control path by the poller.

pub mod config;

pub use config::WeatherConfig;

use serde::Deserialize;
use tracing::debug;

use manostat_app::error::AuxiliaryFetchError;
use manostat_app::ports::AuxiliaryProvider;

const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const ICON_URL: &str = "https://openweathermap.org/img/wn";

/// OpenWeatherMap client with a bounded per-request timeout.
pub struct WeatherClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

/// The slice of the upstream response the display cares about.
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainSection,
    weather: Vec<ConditionSection>,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionSection {
    description: String,
    icon: String,
}

impl WeatherClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuxiliaryFetchError`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: WeatherConfig) -> Result<Self, AuxiliaryFetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(u64::from(config.timeout_secs)))
            .build()
            .map_err(AuxiliaryFetchError::new)?;
        Ok(Self { http, config })
    }

    /// The image URL for an icon code (e.g. `"01d"`).
    #[must_use]
    pub fn icon_url(code: &str) -> String {
        format!("{ICON_URL}/{code}@2x.png")
    }

    fn request_url(&self) -> String {
        format!(
            "{API_URL}?lat={lat}&lon={lon}&appid={key}&units={units}&lang={lang}",
            lat = self.config.latitude,
            lon = self.config.longitude,
            key = self.config.api_key,
            units = self.config.units,
            lang = self.config.lang,
        )
    }
}

/// Flatten the upstream response into the event payload.
fn snapshot_payload(body: &WeatherResponse) -> Result<serde_json::Value, AuxiliaryFetchError> {
    let condition = body
        .weather
        .first()
        .ok_or_else(|| AuxiliaryFetchError::new("response carries no weather condition"))?;
    Ok(serde_json::json!({
        "temperature_c": body.main.temp,
        "description": condition.description,
        "icon": condition.icon,
        "icon_url": WeatherClient::icon_url(&condition.icon),
    }))
}

impl AuxiliaryProvider for WeatherClient {
    async fn fetch(&self) -> Result<serde_json::Value, AuxiliaryFetchError> {
        let response = self
            .http
            .get(self.request_url())
            .send()
            .await
            .map_err(AuxiliaryFetchError::new)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuxiliaryFetchError::new(format!("api returned {status}")));
        }

        let body: WeatherResponse = response.json().await.map_err(AuxiliaryFetchError::new)?;
        debug!(temp = body.main.temp, "weather snapshot fetched");
        snapshot_payload(&body)
    }
}
