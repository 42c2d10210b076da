//! # manostatd — manostat daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (TOML file, env var overrides)
//! - Initialize tracing and the `SQLite` connection pool (running migrations)
//! - Construct the event bus, snapshot channel and shutdown signal
//! - Start the pressure source: either the simulated plant or the MQTT
//!   ingest task — a failed broker subscription aborts startup
//! - Start the persistence drain and, when configured, the weather poller
//! - Build the axum router and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use manostat_adapter_http_axum::state::AppState;
use manostat_adapter_mqtt::TelemetrySource;
use manostat_adapter_storage_sqlite_sqlx::SqliteReadingStore;
use manostat_adapter_weather::WeatherClient;
use manostat_app::supervisor::{SimulationParams, Supervisor};
use manostat_app::{aux_poller, event_bus::EventBus, recorder, shutdown, snapshot};
use manostat_domain::controller::{ActuatorState, ControlState, HysteresisController};
use manostat_domain::plant::PlantModel;
use manostat_domain::thresholds::Thresholds;

use crate::config::Config;

/// Depth of the ingest channel between the MQTT task and the supervisor.
const INGEST_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = manostat_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Bus, snapshot, shutdown
    let bus = std::sync::Arc::new(EventBus::new(config.bus.capacity));
    let initial = ControlState::initial(if config.control.initial_actuator_on {
        ActuatorState::On
    } else {
        ActuatorState::Off
    });
    let (snapshot_tx, snapshot_rx) = snapshot::channel(initial);
    let (shutdown_signal, shutdown) = shutdown::channel();

    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    // Persistence drain
    tasks.push(tokio::spawn(recorder::run(
        SqliteReadingStore::new(pool.clone()),
        bus.subscribe(),
        Duration::from_millis(config.bus.drain_period_ms),
        shutdown.clone(),
    )));

    // Weather collaborator
    if config.weather.enabled() {
        let poll_interval = Duration::from_secs(u64::from(config.weather.poll_interval_secs));
        let client = WeatherClient::new(config.weather.clone())?;
        tasks.push(tokio::spawn(aux_poller::run(
            client,
            std::sync::Arc::clone(&bus),
            poll_interval,
            shutdown.clone(),
        )));
    }

    // Control path
    let thresholds = Thresholds::new(config.control.low_bar, config.control.high_bar)?;
    let controller = HysteresisController::new(thresholds, initial);
    let supervisor = Supervisor::new(controller, std::sync::Arc::clone(&bus), snapshot_tx);

    if config.simulation.enabled {
        let plant = PlantModel::new(
            config.simulation.initial_pressure_bar,
            config.simulation.gain_bar_per_s,
            config.simulation.drain_bar_per_s,
        )?;
        let params = SimulationParams {
            time_step: Duration::from_secs(u64::from(config.simulation.time_step_secs)),
            sample_period: Duration::from_secs(u64::from(config.control.sample_period_secs)),
            noise_bar: config.simulation.noise_bar,
            duration: (config.simulation.duration_secs > 0)
                .then(|| Duration::from_secs(config.simulation.duration_secs)),
        };
        info!("pressure source: simulated plant");
        tasks.push(tokio::spawn(supervisor.run_simulation(
            plant,
            params,
            shutdown.clone(),
        )));
    } else {
        // Connecting and subscribing must succeed before anything else runs;
        // a daemon that silently never receives telemetry is worse than one
        // that refuses to start.
        let source = TelemetrySource::connect(&config.mqtt.telemetry).await?;
        info!(
            broker = %config.mqtt.telemetry.broker_host,
            topic = %config.mqtt.telemetry.topic,
            "pressure source: mqtt"
        );
        let (ingest_tx, ingest_rx) = mpsc::channel(INGEST_CHANNEL_CAPACITY);
        tasks.push(tokio::spawn(source.run(ingest_tx, shutdown.clone())));
        tasks.push(tokio::spawn(supervisor.run_live(ingest_rx, shutdown.clone())));
    }

    // HTTP
    let state = AppState::new(SqliteReadingStore::new(pool), snapshot_rx)
        .with_history_limit(config.server.history_limit);
    let app = manostat_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "manostatd listening");

    let mut serve_shutdown = shutdown.clone();
    let server = tokio::spawn(async move {
        let graceful = async move { serve_shutdown.triggered().await };
        if let Err(err) = axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .await
        {
            tracing::error!(error = %err, "http server failed");
        }
    });

    wait_for_signal().await;
    info!("shutdown requested");
    shutdown_signal.trigger();

    for task in tasks {
        let _ = task.await;
    }
    let _ = server.await;
    info!("manostatd stopped");

    Ok(())
}

/// Block until SIGINT or SIGTERM arrives.
async fn wait_for_signal() {
    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
    {
        Ok(signal) => signal,
        Err(err) => {
            tracing::error!(error = %err, "failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
        _ = sigterm.recv() => info!("received SIGTERM"),
    }
}
