//! Health check endpoints.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/health` - Service status plus the state of the repository and cache
//! - `/cache/stats` - Backend statistics of the cache

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use courseware_core::cache::CacheStats;

use crate::handlers::AppError;
use crate::state::{AppState, CacheMode};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    /// `connected` or `disconnected`.
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
    /// `connected`, `disconnected` or `disabled`.
    pub cache: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub status: &'static str,
    pub data: CacheStats,
}

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /health - Service status, repository and cache backend state.
///
/// Always 200; `status` is `degraded` when the repository does not answer.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let (database, database_error) = match state.catalog.storage_probe().await {
        Ok(()) => ("connected", None),
        Err(err) => ("disconnected", Some(err.to_string())),
    };

    let (cache, cache_error) = match state.cache_mode {
        CacheMode::Disabled => ("disabled", None),
        CacheMode::Enabled => match state.catalog.cache_probe().await {
            Ok(()) => ("connected", None),
            Err(err) => ("disconnected", Some(err.to_string())),
        },
    };

    Json(HealthReport {
        status: if database_error.is_none() {
            "healthy"
        } else {
            "degraded"
        },
        service: env!("CARGO_PKG_NAME"),
        database,
        database_error,
        cache,
        cache_error,
    })
}

/// GET /cache/stats - Cache backend statistics.
///
/// 503 when the cache is disabled or unreachable, 501 when the backend keeps
/// no statistics.
#[axum::debug_handler]
pub async fn cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, AppError> {
    let data = state.catalog.cache_stats().await?;
    Ok(Json(CacheStatsResponse {
        status: "success",
        data,
    }))
}
