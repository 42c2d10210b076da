//! Cooperative shutdown signalling for background tasks.
//!
//! Every long-running task holds a [`ShutdownListener`] and exits its loop
//! once the signal fires. Tasks are never killed mid-decision — the
//! controller step is synchronous and bounded, so loops only check between
//! iterations.

use tokio::sync::watch;

/// Create a linked signal/listener pair.
#[must_use]
pub fn channel() -> (ShutdownSignal, ShutdownListener) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSignal { tx }, ShutdownListener { rx })
}

/// Owner side — trigger once to stop every listener.
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    /// Ask all tasks to finish their current iteration and exit.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Task side — await [`triggered`](Self::triggered) inside a `select!`.
#[derive(Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once shutdown is requested (or the signal owner is gone).
    ///
    /// Cancel-safe: intended as a `tokio::select!` branch.
    pub async fn triggered(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
