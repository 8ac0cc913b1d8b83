use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::OpenApi;

use super::{dto::SensorReadingDto, errors::AppError, AppState};
use crate::store::TimeSeriesStore;

/// Default window size for `GET /readings` (an hour of 10 s samples).
const DEFAULT_WINDOW: i64 = 360;

/// Largest window a single request may ask for.
const MAX_WINDOW: i64 = 10_000;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub limit: Option<i64>,
}

/// Clamp a requested window size into `[1, MAX_WINDOW]`, applying the
/// default when absent.
fn effective_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_WINDOW).clamp(1, MAX_WINDOW)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Fetch the most recent reading. Served from the in-memory cache when the
/// acquisition loop has stored at least one row; falls back to the database
/// (e.g. when this process restarted but the series already has history).
#[utoipa::path(
    get,
    path = "/readings/latest",
    responses(
        (status = 200, description = "Most recent reading, or null if the series is empty", body = SensorReadingDto),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn get_latest_reading(
    State(state): State<AppState>,
) -> Result<Json<Option<SensorReadingDto>>, AppError> {
    if let Some(reading) = state.cache.latest().await {
        return Ok(Json(Some(reading.into())));
    }

    let row = state.store.latest().await?;
    Ok(Json(row.map(Into::into)))
}

/// Fetch the `limit` most recent readings in chronological order.
/// The store hands back the newest rows first; they are reversed here so
/// plotting clients can consume them directly.
#[utoipa::path(
    get,
    path = "/readings",
    params(
        ("limit" = Option<i64>, Query, description = "Window size; defaults to 360, clamped to [1, 10000]"),
    ),
    responses(
        (status = 200, description = "Readings, oldest first", body = Vec<SensorReadingDto>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn get_recent_readings(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<SensorReadingDto>>, AppError> {
    let mut rows = state.store.recent(effective_limit(params.limit)).await?;
    rows.reverse();
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(get_latest_reading, get_recent_readings, health),
    components(schemas(SensorReadingDto)),
    tags(
        (name = "readings", description = "Sensor time-series endpoints"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Indoor Climate Service API",
        version = "0.1.0",
        description = "Read-only API over the BME680 sensor time series"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
