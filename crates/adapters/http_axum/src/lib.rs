//! # manostat-adapter-http-axum
//!
//! HTTP adapter — the read-only supervision API.
//!
//! ## Responsibilities
//! - `GET /data` — current pressure, `{"pressure": <float>}`
//! - `GET /status` — full snapshot including the staleness flag, so a
//!   dashboard can render "unknown/stale" distinctly from a live reading
//! - `GET /latest-data` — most recent persisted readings, newest first
//! - `GET /health` — liveness probe
//!
//! The API never touches the controller: pressure and alert state come
//! from the supervisor's snapshot, history from the reading store.
//!
//! ## Dependency rule
//! Depends on `manostat-app` (ports, snapshot) and `manostat-domain` only.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
