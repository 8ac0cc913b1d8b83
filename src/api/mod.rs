pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{routing::get, Router};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{reading_cache::ReadingCache, store::PgTimeSeriesStore};

use handlers::ApiDoc;

/// Shared state for the read-only API: the Postgres-backed store and the
/// latest-reading cache the acquisition loop keeps warm.
#[derive(Clone)]
pub struct AppState {
    pub store: PgTimeSeriesStore,
    pub cache: ReadingCache,
}

impl AppState {
    pub fn new(pool: PgPool, cache: ReadingCache) -> Self {
        Self {
            store: PgTimeSeriesStore::new(pool),
            cache,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/readings", get(handlers::get_recent_readings))
        .route("/readings/latest", get(handlers::get_latest_reading))
        .with_state(state)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
