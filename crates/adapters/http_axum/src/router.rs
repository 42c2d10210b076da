//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use manostat_app::ports::ReadingStore;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<RS>(state: AppState<RS>) -> Router
where
    RS: ReadingStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/data", get(crate::api::latest::<RS>))
        .route("/status", get(crate::api::status::<RS>))
        .route("/latest-data", get(crate::api::history::<RS>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
