//! # manostat-domain
//!
//! Pure domain model for the manostat compressed-air supervision system.
//!
//! ## Responsibilities
//! - Foundational types: timestamps, error conventions
//! - Define **Readings** (timestamped pressure samples, finite by construction)
//! - Define **Thresholds** (the low/high trip points, immutable after startup)
//! - Define the **hysteresis controller** (the pure actuator/alert decision)
//! - Define the **plant model** (deterministic physical surrogate for simulation)
//! - Define **Events** (the tagged union carried by the event bus)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod controller;
pub mod event;
pub mod plant;
pub mod reading;
pub mod thresholds;
