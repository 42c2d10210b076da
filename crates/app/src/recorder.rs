//! Recorder — the persistence consumer.
//!
//! Drains its own bus subscription on a fixed period (default 100ms) and
//! appends every accepted reading to the store. Runs entirely on the
//! consumer side: it can never block producers, and a store failure is
//! logged and skipped so the control path stays unaffected.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use manostat_domain::event::EventKind;

use crate::event_bus::Subscriber;
use crate::ports::ReadingStore;
use crate::shutdown::ShutdownListener;

/// Run the persistence drain loop until shutdown.
///
/// On shutdown the buffer is drained one final time so readings published
/// just before the signal still reach the store.
pub async fn run<S: ReadingStore>(
    store: S,
    mut subscription: Subscriber,
    drain_period: Duration,
    mut shutdown: ShutdownListener,
) {
    let mut tick = tokio::time::interval(drain_period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => record_batch(&store, &mut subscription).await,
            () = shutdown.triggered() => {
                record_batch(&store, &mut subscription).await;
                break;
            }
        }
    }
    info!("recorder stopped");
}

async fn record_batch<S: ReadingStore>(store: &S, subscription: &mut Subscriber) {
    for event in subscription.drain() {
        match event.kind {
            EventKind::ReadingUpdate(reading) => {
                if let Err(err) = store.record(&reading).await {
                    error!(
                        pressure_bar = reading.pressure_bar,
                        error = %err,
                        "failed to persist reading"
                    );
                }
            }
            EventKind::EventsDropped { count } => {
                warn!(count, "recorder lagged — readings lost before persistence");
            }
            _ => {}
        }
    }
}
