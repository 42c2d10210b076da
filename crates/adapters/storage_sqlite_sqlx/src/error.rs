//! Storage adapter error types.

use manostat_app::error::AppError;

/// Errors specific to the `SQLite` adapter.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Connection or query failure.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(Box::new(err))
    }
}
