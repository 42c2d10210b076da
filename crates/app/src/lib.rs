//! # manostat-app
//!
//! Application layer — concurrency plumbing and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - [`ports::ReadingStore`] — append-only persistence of accepted readings
//!   - [`ports::AuxiliaryProvider`] — low-priority weather/auxiliary fetch
//!   - [`ports::EventPublisher`] — non-blocking event publication
//! - Provide the in-process [`event_bus`] (bounded, fan-out, drop-oldest)
//! - Run the supervision tasks:
//!   - [`supervisor`] — the sampling/plant scheduler and the sporadic
//!     threshold-evaluation step (sole owner of the actuator state)
//!   - [`recorder`] — fixed-period persistence consumer
//!   - [`aux_poller`] — isolated weather producer
//! - Expose the thread-safe [`snapshot`] accessor for external readers
//!
//! ## Dependency rule
//! Depends on `manostat-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod aux_poller;
pub mod error;
pub mod event_bus;
pub mod ports;
pub mod recorder;
pub mod shutdown;
pub mod snapshot;
pub mod supervisor;
