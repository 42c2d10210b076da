//! Auxiliary poller — the low-priority weather producer.
//!
//! Fetches one snapshot, publishes the outcome, then sleeps a long
//! inter-poll interval (default 300s). Failures are isolated: they become
//! `AuxiliaryFetchFailed` events and can never touch the actuator, the
//! alert level, or any control-path event.

use std::time::Duration;

use tracing::{debug, info, warn};

use manostat_domain::event::{Event, EventKind};

use crate::ports::{AuxiliaryProvider, EventPublisher};
use crate::shutdown::ShutdownListener;

/// Run the poll loop until shutdown.
///
/// The request timeout is the provider's responsibility; this loop only
/// spaces calls out and converts outcomes into events.
pub async fn run<A: AuxiliaryProvider, P: EventPublisher>(
    provider: A,
    publisher: P,
    poll_interval: Duration,
    mut shutdown: ShutdownListener,
) {
    loop {
        match provider.fetch().await {
            Ok(payload) => {
                debug!("auxiliary snapshot received");
                publisher.publish(Event::new(EventKind::AuxiliaryUpdate(payload)));
            }
            Err(err) => {
                warn!(error = %err, "auxiliary fetch failed");
                publisher.publish(Event::new(EventKind::AuxiliaryFetchFailed {
                    message: err.message,
                }));
            }
        }

        tokio::select! {
            () = tokio::time::sleep(poll_interval) => {}
            () = shutdown.triggered() => break,
        }
    }
    info!("auxiliary poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::error::AuxiliaryFetchError;
    use crate::event_bus::EventBus;
    use crate::shutdown;

    struct FlakyProvider {
        calls: Arc<AtomicU32>,
        fail: bool,
    }

    impl AuxiliaryProvider for FlakyProvider {
        async fn fetch(&self) -> Result<serde_json::Value, AuxiliaryFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AuxiliaryFetchError::new("api unreachable"))
            } else {
                Ok(serde_json::json!({"temperature_c": 31.2, "description": "céu limpo"}))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_snapshot_on_success() {
        let bus = Arc::new(EventBus::new(16));
        let mut sub = bus.subscribe();
        let (signal, listener) = shutdown::channel();
        let provider = FlakyProvider {
            calls: Arc::new(AtomicU32::new(0)),
            fail: false,
        };

        let handle = tokio::spawn(run(
            provider,
            Arc::clone(&bus),
            Duration::from_secs(300),
            listener,
        ));
        tokio::time::advance(Duration::from_millis(1)).await;
        signal.trigger();
        handle.await.unwrap();

        let events = sub.drain();
        assert!(
            events
                .iter()
                .any(|e| matches!(e.kind, EventKind::AuxiliaryUpdate(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_isolate_repeated_failures_from_control_path() {
        let bus = Arc::new(EventBus::new(64));
        let mut sub = bus.subscribe();
        let (signal, listener) = shutdown::channel();
        let calls = Arc::new(AtomicU32::new(0));
        let provider = FlakyProvider {
            calls: Arc::clone(&calls),
            fail: true,
        };

        let handle = tokio::spawn(run(
            provider,
            Arc::clone(&bus),
            Duration::from_secs(300),
            listener,
        ));
        // The poller must reach its first sleep before the clock moves,
        // otherwise the advances coalesce into one.
        tokio::task::yield_now().await;

        // Let several poll cycles fail.
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(300)).await;
            // `advance` wakes the expired timer but does not poll the woken
            // task before returning; yield so each advance completes a cycle.
            tokio::task::yield_now().await;
        }
        signal.trigger();
        handle.await.unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 5);
        for event in sub.drain() {
            // Only isolated auxiliary failures — never a control-path event
            // and never a staleness marker.
            assert!(matches!(event.kind, EventKind::AuxiliaryFetchFailed { .. }));
            assert!(!event.marks_stale());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_wait_full_interval_between_polls() {
        let bus = Arc::new(EventBus::new(16));
        let (signal, listener) = shutdown::channel();
        let calls = Arc::new(AtomicU32::new(0));
        let provider = FlakyProvider {
            calls: Arc::clone(&calls),
            fail: false,
        };

        let handle = tokio::spawn(run(
            provider,
            Arc::clone(&bus),
            Duration::from_secs(300),
            listener,
        ));
        // The poller must reach its first sleep before the clock moves.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(299)).await;
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        signal.trigger();
        handle.await.unwrap();
    }
}
