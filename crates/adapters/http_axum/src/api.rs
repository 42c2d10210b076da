//! JSON handlers for the supervision API.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use manostat_app::ports::{ReadingStore, StoredReading};
use manostat_app::snapshot::StatusSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of the latest-value query.
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    /// Last accepted pressure in bar; `0.0` before the first reading,
    /// matching the pre-first-reading behaviour clients already expect.
    pub pressure: f64,
}

/// `GET /data` — the latest pressure value.
pub async fn latest<RS>(State(state): State<AppState<RS>>) -> Json<LatestResponse>
where
    RS: ReadingStore + Send + Sync + 'static,
{
    let snapshot = state.snapshot.current();
    Json(LatestResponse {
        pressure: snapshot.pressure_bar.unwrap_or(0.0),
    })
}

/// `GET /status` — the full snapshot, staleness flag included.
///
/// This is how consumers distinguish "unknown/stale" from a genuine
/// normal/low/high reading after a transport error or bus overflow.
pub async fn status<RS>(State(state): State<AppState<RS>>) -> Json<StatusSnapshot>
where
    RS: ReadingStore + Send + Sync + 'static,
{
    Json(state.snapshot.current())
}

/// `GET /latest-data` — the most recent persisted readings, newest first.
pub async fn history<RS>(
    State(state): State<AppState<RS>>,
) -> Result<Json<Vec<StoredReading>>, ApiError>
where
    RS: ReadingStore + Send + Sync + 'static,
{
    let rows = state.reading_store.recent(state.history_limit).await?;
    Ok(Json(rows))
}
