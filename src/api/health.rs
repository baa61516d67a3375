use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::service::AppState;

/// Operator view of what the service loaded at startup
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_trained_at: Option<DateTime<Utc>>,
    station_count: usize,
    search_radius_km: f64,
}

/// GET /api/healthz - Liveness probe
pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /api/status - Loaded model and dataset summary
///
/// Always 200: a missing model or empty table is a degraded but valid state.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let service = &state.service;
    let metadata = service.predictor().metadata();

    Json(StatusResponse {
        model_loaded: service.predictor().is_loaded(),
        model_id: metadata.map(|m| m.model_id.clone()),
        model_trained_at: metadata.map(|m| m.trained_at),
        station_count: service.stations().len(),
        search_radius_km: service.search().radius_km(),
    })
}
