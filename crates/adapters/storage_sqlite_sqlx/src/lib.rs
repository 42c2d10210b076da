//! # manostat-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`ReadingStore`](manostat_app::ports::ReadingStore) port
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map between domain readings and `pressure_readings` rows
//!
//! ## Dependency rule
//! Depends on `manostat-app` (for the port trait) and `manostat-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod error;
pub mod pool;
pub mod reading_store;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use reading_store::SqliteReadingStore;
