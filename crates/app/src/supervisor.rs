//! Supervisor — the sampling scheduler and the sporadic decision step.
//!
//! Two cadences, neither allowed to block the other:
//!
//! - the fixed-period sampling tick (simulation mode pulls from the plant
//!   model; live mode is sporadic, triggered by decoded telemetry), and
//! - the continuous plant update tick (simulation mode only).
//!
//! The supervisor owns the [`HysteresisController`] and is the only writer
//! of the actuator state. Every accepted reading publishes one
//! `ReadingUpdate` and, when the decision changed, exactly one paired
//! `AlertTransition` on the same producer stream. Failed readings publish
//! `TransportError` and hold the last known state.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use manostat_domain::controller::{ControlState, HysteresisController};
use manostat_domain::event::{Event, EventKind};
use manostat_domain::plant::PlantModel;
use manostat_domain::reading::Reading;
use manostat_domain::time;

use crate::ports::EventPublisher;
use crate::shutdown::ShutdownListener;
use crate::snapshot::SnapshotTx;

/// One message from the telemetry ingest task.
#[derive(Debug)]
pub enum IngestMessage {
    /// A decoded, validated reading.
    Reading(Reading),
    /// Decode or transport failure; the reading (if any) was dropped.
    TransportError(String),
}

/// Simulation cadence and physics noise.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// Plant update period (default 1s).
    pub time_step: Duration,
    /// Sensor sampling period (default 5s).
    pub sample_period: Duration,
    /// Bound of the uniform sampling noise in bar (0 disables it).
    pub noise_bar: f64,
    /// Stop after this long; `None` runs until shutdown.
    pub duration: Option<Duration>,
}

/// The control-path task. Owns the controller state for its whole life.
pub struct Supervisor<P> {
    controller: HysteresisController,
    publisher: P,
    snapshot: SnapshotTx,
}

impl<P: EventPublisher> Supervisor<P> {
    /// Create a supervisor around the configured controller.
    pub fn new(controller: HysteresisController, publisher: P, snapshot: SnapshotTx) -> Self {
        Self {
            controller,
            publisher,
            snapshot,
        }
    }

    /// Current `(actuator, alert)` pair.
    #[must_use]
    pub fn state(&self) -> ControlState {
        self.controller.state()
    }

    /// The sporadic step: evaluate one reading.
    ///
    /// Publishes `ReadingUpdate`, then — only if the decision changed the
    /// pair — one `AlertTransition` carrying both new values, and refreshes
    /// the snapshot.
    pub fn step(&mut self, reading: Reading) {
        self.publisher
            .publish(Event::new(EventKind::ReadingUpdate(reading)));

        if let Some(state) = self.controller.observe(&reading) {
            info!(
                pressure_bar = reading.pressure_bar,
                alert = ?state.alert,
                actuator = ?state.actuator,
                "alert transition"
            );
            self.publisher.publish(Event::new(EventKind::AlertTransition {
                alert: state.alert,
                actuator: state.actuator,
            }));
        } else {
            debug!(pressure_bar = reading.pressure_bar, "reading in steady state");
        }

        self.snapshot.reading_accepted(&reading, self.controller.state());
    }

    /// Report a failed reading: publish `TransportError`, hold the last
    /// known state, and flag the snapshot stale.
    pub fn transport_error(&mut self, message: String) {
        warn!(%message, "transport error — holding last known state");
        self.publisher
            .publish(Event::new(EventKind::TransportError { message }));
        self.snapshot.mark_stale();
    }

    /// Live mode: consume decoded telemetry until the channel closes or
    /// shutdown fires.
    ///
    /// The ingest task may block on the transport; this task never does —
    /// it only computes and publishes.
    pub async fn run_live(
        mut self,
        mut ingest: mpsc::Receiver<IngestMessage>,
        mut shutdown: ShutdownListener,
    ) {
        loop {
            tokio::select! {
                message = ingest.recv() => match message {
                    Some(IngestMessage::Reading(reading)) => self.step(reading),
                    Some(IngestMessage::TransportError(message)) => {
                        self.transport_error(message);
                    }
                    None => {
                        warn!("telemetry channel closed — supervisor stopping");
                        break;
                    }
                },
                () = shutdown.triggered() => break,
            }
        }
        info!("supervisor stopped");
    }

    /// Simulation mode: drive the plant and sample it on a fixed period.
    ///
    /// Both intervals skip missed ticks instead of bunching them up — the
    /// schedule advances by exactly one period per fire, so jitter never
    /// compounds and a late tick is simply skipped.
    pub async fn run_simulation(
        mut self,
        mut plant: PlantModel,
        params: SimulationParams,
        mut shutdown: ShutdownListener,
    ) {
        let mut plant_tick = tokio::time::interval(params.time_step);
        plant_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sample_tick = tokio::time::interval(params.sample_period);
        sample_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let started = tokio::time::Instant::now();
        let dt_s = params.time_step.as_secs_f64();

        loop {
            tokio::select! {
                _ = plant_tick.tick() => {
                    plant.advance(self.controller.state().actuator, dt_s);
                }
                _ = sample_tick.tick() => {
                    let value = plant.sample(sample_noise(params.noise_bar));
                    match Reading::at(value, time::now()) {
                        Ok(reading) => self.step(reading),
                        // Unreachable with validated plant parameters, but a
                        // runaway gain must not take the loop down.
                        Err(err) => self.transport_error(err.to_string()),
                    }
                }
                () = shutdown.triggered() => break,
            }

            if let Some(duration) = params.duration {
                if started.elapsed() >= duration {
                    info!(secs = duration.as_secs(), "simulation duration reached");
                    break;
                }
            }
        }
        info!("supervisor stopped");
    }
}

/// Uniform noise in `[-bound, bound]` bar; zero bound is deterministic.
fn sample_noise(bound: f64) -> f64 {
    if bound > 0.0 {
        use rand::Rng as _;
        rand::thread_rng().gen_range(-bound..=bound)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manostat_domain::controller::{ActuatorState, AlertLevel};
    use manostat_domain::thresholds::Thresholds;

    use crate::event_bus::EventBus;
    use crate::snapshot;

    fn wired_supervisor() -> (
        Supervisor<std::sync::Arc<EventBus>>,
        crate::event_bus::Subscriber,
        crate::snapshot::SnapshotRx,
    ) {
        let bus = std::sync::Arc::new(EventBus::new(64));
        let sub = bus.subscribe();
        let initial = ControlState::initial(ActuatorState::Off);
        let (tx, rx) = snapshot::channel(initial);
        let controller =
            HysteresisController::new(Thresholds::new(7.0, 9.0).unwrap(), initial);
        (Supervisor::new(controller, bus, tx), sub, rx)
    }

    fn reading(p: f64) -> Reading {
        Reading::new(p).unwrap()
    }

    #[tokio::test]
    async fn should_pair_transition_with_its_reading() {
        let (mut sup, mut sub, _rx) = wired_supervisor();
        sup.step(reading(6.5));

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].kind, EventKind::ReadingUpdate(_)));
        assert!(matches!(
            events[1].kind,
            EventKind::AlertTransition {
                alert: AlertLevel::Low,
                actuator: ActuatorState::On,
            }
        ));
    }

    #[tokio::test]
    async fn should_not_emit_transition_for_steady_readings() {
        let (mut sup, mut sub, _rx) = wired_supervisor();
        sup.step(reading(8.0));

        let events = sub.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, EventKind::ReadingUpdate(_)));
    }

    #[tokio::test]
    async fn should_emit_reference_scenario_transitions() {
        let (mut sup, mut sub, _rx) = wired_supervisor();
        for p in [6.5, 6.6, 7.0, 8.0, 9.2, 9.5, 8.5] {
            sup.step(reading(p));
        }

        let transitions: Vec<(AlertLevel, ActuatorState)> = sub
            .drain()
            .into_iter()
            .filter_map(|e| match e.kind {
                EventKind::AlertTransition { alert, actuator } => Some((alert, actuator)),
                _ => None,
            })
            .collect();

        assert_eq!(
            transitions,
            vec![
                (AlertLevel::Low, ActuatorState::On),
                (AlertLevel::Normal, ActuatorState::On),
                (AlertLevel::High, ActuatorState::Off),
                (AlertLevel::Normal, ActuatorState::Off),
            ]
        );
    }

    #[tokio::test]
    async fn should_hold_state_and_mark_stale_on_transport_error() {
        let (mut sup, mut sub, rx) = wired_supervisor();
        sup.step(reading(6.5));
        let before = sup.state();
        sub.drain();

        sup.transport_error("payload \"abc\" is not a number".into());

        assert_eq!(sup.state(), before);
        assert!(rx.current().stale);
        let events = sub.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, EventKind::TransportError { .. }));
    }

    #[tokio::test]
    async fn should_clear_staleness_on_next_good_reading() {
        let (mut sup, _sub, rx) = wired_supervisor();
        sup.transport_error("broker unreachable".into());
        assert!(rx.current().stale);

        sup.step(reading(8.0));
        assert!(!rx.current().stale);
        assert_eq!(rx.current().pressure_bar, Some(8.0));
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_live_loop_on_shutdown() {
        let (sup, _sub, _rx) = wired_supervisor();
        let (tx, ingest) = mpsc::channel(8);
        let (signal, listener) = crate::shutdown::channel();

        let handle = tokio::spawn(sup.run_live(ingest, listener));
        signal.trigger();
        handle.await.unwrap();
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn should_engage_compressor_in_simulation() {
        // Starting under-pressure at 6.5 with the compressor off, the first
        // sample must engage it and pressure must start rising.
        let bus = std::sync::Arc::new(EventBus::new(256));
        let mut sub = bus.subscribe();
        let initial = ControlState::initial(ActuatorState::Off);
        let (tx, rx) = snapshot::channel(initial);
        let controller =
            HysteresisController::new(Thresholds::new(7.0, 9.0).unwrap(), initial);
        let sup = Supervisor::new(controller, std::sync::Arc::clone(&bus), tx);

        let plant = PlantModel::new(6.5, 0.4, 0.1).unwrap();
        let params = SimulationParams {
            time_step: Duration::from_secs(1),
            sample_period: Duration::from_secs(5),
            noise_bar: 0.0,
            duration: Some(Duration::from_secs(30)),
        };
        let (_signal, listener) = crate::shutdown::channel();

        let handle = tokio::spawn(sup.run_simulation(plant, params, listener));
        for _ in 0..31 {
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        handle.await.unwrap();

        let transitions: Vec<(AlertLevel, ActuatorState)> = sub
            .drain()
            .into_iter()
            .filter_map(|e| match e.kind {
                EventKind::AlertTransition { alert, actuator } => Some((alert, actuator)),
                _ => None,
            })
            .collect();

        // Under-pressure start engages the compressor; the gain then drives
        // pressure through the band and the controller cuts it above 9.0.
        assert_eq!(
            transitions.first(),
            Some(&(AlertLevel::Low, ActuatorState::On))
        );
        assert!(transitions.contains(&(AlertLevel::High, ActuatorState::Off)));
        assert!(rx.current().pressure_bar.unwrap() > 6.5);
    }
}
