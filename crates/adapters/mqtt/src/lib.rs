//! # manostat-adapter-mqtt
//!
//! MQTT telemetry adapter — the live sensor channel.
//!
//! ## Responsibilities
//! - Connect to the broker and subscribe to the pressure topic; a
//!   subscription that cannot be acknowledged at startup is fatal
//! - Decode each payload (UTF-8 decimal ASCII) into a validated reading
//! - Forward readings to the supervisor over an internal channel — the
//!   decision logic never runs inside the transport callback context
//! - Surface decode and connection failures as transport errors; the
//!   rumqttc event loop owns reconnection
//!
//! ## Dependency rule
//! Depends on `manostat-app` (ingest message type, shutdown) and
//! `manostat-domain` only.

pub mod config;
pub mod decode;
pub mod error;

pub use config::TelemetryConfig;
pub use error::TelemetryError;

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use manostat_app::shutdown::ShutdownListener;
use manostat_app::supervisor::IngestMessage;
use manostat_domain::reading::Reading;

use crate::decode::decode_payload;

/// Pause between polls after a connection error, so a dead broker does not
/// spin the loop.
const RECONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// A connected, subscribed telemetry channel.
pub struct TelemetrySource {
    client: AsyncClient,
    event_loop: EventLoop,
    topic: String,
}

impl TelemetrySource {
    /// Connect to the broker and wait for the subscription to be
    /// acknowledged.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if the subscribe request fails, the
    /// connection breaks before the acknowledgement, or the configured
    /// startup timeout elapses. All three must abort startup.
    pub async fn connect(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let mut options = MqttOptions::new(
            &config.client_id,
            &config.broker_host,
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

        let (client, mut event_loop) = AsyncClient::new(options, 16);
        client
            .subscribe(&config.topic, QoS::AtLeastOnce)
            .await
            .map_err(|source| TelemetryError::Subscribe {
                topic: config.topic.clone(),
                source,
            })?;

        // Drive the event loop until the broker acknowledges the
        // subscription. Running degraded without telemetry is worse than
        // failing loudly here.
        let deadline = Duration::from_secs(u64::from(config.connect_timeout_secs));
        let wait = async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::SubAck(_))) => return Ok(()),
                    Ok(_) => {}
                    Err(err) => return Err(TelemetryError::Connect(err)),
                }
            }
        };
        match tokio::time::timeout(deadline, wait).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(_) => {
                return Err(TelemetryError::SubscribeTimeout {
                    topic: config.topic.clone(),
                    timeout_secs: config.connect_timeout_secs,
                });
            }
        }

        info!(topic = %config.topic, broker = %config.broker_host, "telemetry subscribed");
        Ok(Self {
            client,
            event_loop,
            topic: config.topic.clone(),
        })
    }

    /// Pump the broker event loop until the supervisor goes away or
    /// shutdown fires.
    ///
    /// This task may block waiting on the transport; the supervisor never
    /// does — every decoded message crosses the channel instead.
    pub async fn run(mut self, tx: mpsc::Sender<IngestMessage>, mut shutdown: ShutdownListener) {
        loop {
            tokio::select! {
                event = self.event_loop.poll() => {
                    let keep_going = self.handle_event(event, &tx).await;
                    if !keep_going {
                        break;
                    }
                }
                () = shutdown.triggered() => break,
            }
        }
        info!("telemetry ingest stopped");
    }

    /// Returns false once the supervisor side of the channel is gone.
    async fn handle_event(
        &mut self,
        event: Result<Event, rumqttc::ConnectionError>,
        tx: &mpsc::Sender<IngestMessage>,
    ) -> bool {
        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = match decode_payload(&publish.payload) {
                    Ok(value) => match Reading::new(value) {
                        Ok(reading) => IngestMessage::Reading(reading),
                        Err(err) => IngestMessage::TransportError(err.to_string()),
                    },
                    Err(err) => {
                        warn!(topic = %publish.topic, error = %err, "dropping malformed payload");
                        IngestMessage::TransportError(err.to_string())
                    }
                };
                tx.send(message).await.is_ok()
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("mqtt connected");
                // Re-subscribe on every (re)connect — the broker may have
                // dropped the session while we were away.
                if let Err(err) = self.client.subscribe(&self.topic, QoS::AtLeastOnce).await {
                    error!(topic = %self.topic, error = %err, "re-subscribe failed");
                }
                true
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                warn!("mqtt disconnected");
                tx.send(IngestMessage::TransportError(
                    "broker disconnected".to_string(),
                ))
                .await
                .is_ok()
            }
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "mqtt connection error — event loop will reconnect");
                let alive = tx
                    .send(IngestMessage::TransportError(err.to_string()))
                    .await
                    .is_ok();
                tokio::time::sleep(RECONNECT_BACKOFF).await;
                alive
            }
        }
    }
}
