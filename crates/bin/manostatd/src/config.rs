//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `manostat.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use manostat_adapter_mqtt::TelemetryConfig;
use manostat_adapter_weather::WeatherConfig;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Control-loop thresholds and cadence.
    pub control: ControlConfig,
    /// Simulated plant settings.
    pub simulation: SimulationConfig,
    /// Event bus sizing.
    pub bus: BusConfig,
    /// MQTT telemetry ingest settings.
    pub mqtt: MqttConfig,
    /// Weather collaborator settings.
    pub weather: WeatherConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Row count returned by the history endpoint.
    pub history_limit: u32,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Hysteresis band and sampling cadence for the pressure controller.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Compressor cut-in pressure in bar.
    pub low_bar: f64,
    /// Compressor cut-out pressure in bar.
    pub high_bar: f64,
    /// Seconds between sensor samples (simulation mode).
    pub sample_period_secs: u32,
    /// Whether the compressor is assumed running at startup.
    pub initial_actuator_on: bool,
}

/// Physics of the simulated air network.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Run against the simulated plant instead of live telemetry.
    pub enabled: bool,
    /// Network pressure at startup, in bar.
    pub initial_pressure_bar: f64,
    /// Pressure gained per second while the compressor runs.
    pub gain_bar_per_s: f64,
    /// Pressure lost per second to consumption.
    pub drain_bar_per_s: f64,
    /// Seconds between plant updates.
    pub time_step_secs: u32,
    /// Bound of the uniform sampling noise in bar.
    pub noise_bar: f64,
    /// Stop the simulation after this many seconds; 0 runs until shutdown.
    pub duration_secs: u64,
}

/// Event bus sizing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Per-subscriber buffer capacity. The oldest events are dropped on
    /// overflow.
    pub capacity: usize,
    /// Milliseconds between persistence drains.
    pub drain_period_ms: u64,
}

/// MQTT ingest toggle plus the transport settings it wraps.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Consume live telemetry from the broker.
    pub enabled: bool,
    /// Broker and topic settings.
    #[serde(flatten)]
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Load configuration from `manostat.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// the resulting configuration is semantically invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("manostat.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production; a plain closure in tests).
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("MANOSTAT_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("MANOSTAT_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("MANOSTAT_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("MANOSTAT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("MANOSTAT_MQTT_BROKER") {
            // Pointing at a broker selects live telemetry as the pressure
            // source, so the simulated plant steps aside.
            self.mqtt.enabled = true;
            self.simulation.enabled = false;
            if let Some((host, port)) = val.rsplit_once(':') {
                self.mqtt.telemetry.broker_host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.mqtt.telemetry.broker_port = port;
                }
            } else {
                self.mqtt.telemetry.broker_host = val;
            }
        }
        if let Some(val) = var("MANOSTAT_WEATHER_API_KEY") {
            self.weather.api_key = val;
        }
        if let Some(val) = var("MANOSTAT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if !(self.control.low_bar.is_finite() && self.control.high_bar.is_finite())
            || self.control.low_bar >= self.control.high_bar
        {
            return Err(ConfigError::Validation(
                "control.low_bar must be below control.high_bar".to_string(),
            ));
        }
        if self.control.sample_period_secs == 0 {
            return Err(ConfigError::Validation(
                "control.sample_period_secs must be non-zero".to_string(),
            ));
        }
        if self.simulation.time_step_secs == 0 {
            return Err(ConfigError::Validation(
                "simulation.time_step_secs must be non-zero".to_string(),
            ));
        }
        if self.bus.capacity == 0 {
            return Err(ConfigError::Validation(
                "bus.capacity must be non-zero".to_string(),
            ));
        }
        if self.bus.drain_period_ms == 0 {
            return Err(ConfigError::Validation(
                "bus.drain_period_ms must be non-zero".to_string(),
            ));
        }
        if self.server.history_limit == 0 {
            return Err(ConfigError::Validation(
                "server.history_limit must be non-zero".to_string(),
            ));
        }
        if !self.simulation.enabled && !self.mqtt.enabled {
            return Err(ConfigError::Validation(
                "no pressure source: enable simulation or mqtt".to_string(),
            ));
        }
        if self.simulation.enabled && self.mqtt.enabled {
            return Err(ConfigError::Validation(
                "simulation and mqtt are mutually exclusive pressure sources".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            history_limit: 20,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:manostat.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "manostatd=info,manostat=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            low_bar: 7.0,
            high_bar: 9.0,
            sample_period_secs: 5,
            initial_actuator_on: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_pressure_bar: 6.5,
            gain_bar_per_s: 0.4,
            drain_bar_per_s: 0.1,
            time_step_secs: 1,
            noise_bar: 0.05,
            duration_secs: 0,
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            drain_period_ms: 100,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:manostat.db?mode=rwc");
        assert!((config.control.low_bar - 7.0).abs() < f64::EPSILON);
        assert!((config.control.high_bar - 9.0).abs() < f64::EPSILON);
        assert!(config.simulation.enabled);
        assert!(!config.mqtt.enabled);
        assert!(!config.weather.enabled());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.simulation.enabled);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r"
            [server]
            host = '127.0.0.1'
            port = 9090
            history_limit = 50

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [control]
            low_bar = 6.5
            high_bar = 8.5
            sample_period_secs = 2
            initial_actuator_on = true

            [simulation]
            enabled = false
            initial_pressure_bar = 7.2
            gain_bar_per_s = 0.5
            drain_bar_per_s = 0.2
            time_step_secs = 1
            noise_bar = 0.0
            duration_secs = 120

            [bus]
            capacity = 64
            drain_period_ms = 250

            [mqtt]
            enabled = true
            broker_host = 'mqtt.plant.example'
            broker_port = 8883
            topic = 'plant/line2/pressure'

            [weather]
            api_key = 'abc123'
            poll_interval_secs = 600
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.history_limit, 50);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert!((config.control.low_bar - 6.5).abs() < f64::EPSILON);
        assert!(config.control.initial_actuator_on);
        assert!(!config.simulation.enabled);
        assert_eq!(config.simulation.duration_secs, 120);
        assert_eq!(config.bus.capacity, 64);
        assert!(config.mqtt.enabled);
        assert_eq!(config.mqtt.telemetry.broker_host, "mqtt.plant.example");
        assert_eq!(config.mqtt.telemetry.broker_port, 8883);
        assert_eq!(config.mqtt.telemetry.topic, "plant/line2/pressure");
        assert!(config.weather.enabled());
        assert_eq!(config.weather.poll_interval_secs, 600);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_inverted_thresholds() {
        let mut config = Config::default();
        config.control.low_bar = 9.0;
        config.control.high_bar = 7.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_equal_thresholds() {
        let mut config = Config::default();
        config.control.low_bar = 8.0;
        config.control.high_bar = 8.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_sample_period() {
        let mut config = Config::default();
        config.control.sample_period_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_bus_capacity() {
        let mut config = Config::default();
        config.bus.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_missing_pressure_source() {
        let mut config = Config::default();
        config.simulation.enabled = false;
        config.mqtt.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_two_pressure_sources() {
        let mut config = Config::default();
        config.simulation.enabled = true;
        config.mqtt.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_mqtt_only_source() {
        let mut config = Config::default();
        config.simulation.enabled = false;
        config.mqtt.enabled = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_accept_valid_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [control]
            high_bar = 10.0
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!((config.control.high_bar - 10.0).abs() < f64::EPSILON);
        assert!((config.control.low_bar - 7.0).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.mqtt.telemetry.topic, "sensor/pressao");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_zero_history_limit() {
        let mut config = Config::default();
        config.server.history_limit = 0;
        assert!(config.validate().is_err());
    }

    fn overrides<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, val)| (*val).to_string())
        }
    }

    #[test]
    fn should_override_bind_and_database_from_variables() {
        let mut config = Config::default();
        config.apply_overrides(overrides(&[
            ("MANOSTAT_BIND", "127.0.0.1:9999"),
            ("MANOSTAT_DATABASE_URL", "sqlite:/var/lib/manostat.db"),
            ("MANOSTAT_LOG", "trace"),
        ]));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.database.url, "sqlite:/var/lib/manostat.db");
        assert_eq!(config.logging.filter, "trace");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_switch_pressure_source_when_broker_variable_set() {
        // Pointing at a broker alone must yield a valid configuration:
        // mqtt on, simulation off.
        let mut config = Config::default();
        config.apply_overrides(overrides(&[(
            "MANOSTAT_MQTT_BROKER",
            "mqtt.plant.example:8883",
        )]));

        assert!(config.mqtt.enabled);
        assert!(!config.simulation.enabled);
        assert_eq!(config.mqtt.telemetry.broker_host, "mqtt.plant.example");
        assert_eq!(config.mqtt.telemetry.broker_port, 8883);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_default_broker_port_when_variable_has_no_port() {
        let mut config = Config::default();
        config.apply_overrides(overrides(&[("MANOSTAT_MQTT_BROKER", "192.168.1.50")]));

        assert!(config.mqtt.enabled);
        assert_eq!(config.mqtt.telemetry.broker_host, "192.168.1.50");
        assert_eq!(config.mqtt.telemetry.broker_port, 1883);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_leave_defaults_when_no_variables_set() {
        let mut config = Config::default();
        config.apply_overrides(|_| None);

        assert!(config.simulation.enabled);
        assert!(!config.mqtt.enabled);
        assert_eq!(config.server.port, 3000);
    }
}
