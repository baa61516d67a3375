#![allow(dead_code)]
//! Fixtures shared by the integration tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use wind_power_service::api;
use wind_power_service::config::Config;
use wind_power_service::domain::WeatherStation;
use wind_power_service::ml::{LinearRegressionModel, ModelMetadata, PowerPredictor};
use wind_power_service::optimizer::SiteSearch;
use wind_power_service::service::{AppState, WindPowerService};
use wind_power_service::weather::WeatherTable;

pub const PREDICT_PATH: &str = "/api/predict_power/";

/// Model computing `1.234 * wspd + 0.5 * windmills + 0.0001`
pub fn wind_model() -> LinearRegressionModel {
    LinearRegressionModel::new(
        ["tavg", "pres", "wspd", "windmills"].iter().map(|s| s.to_string()).collect(),
        vec![0.0, 0.0, 1.234, 0.5],
        0.0001,
        ModelMetadata {
            model_id: "fixture".to_string(),
            version: "test".to_string(),
            trained_at: chrono::Utc::now(),
            training_samples: 0,
            test_samples: 0,
            validation_metrics: None,
        },
    )
    .unwrap()
}

/// Three stations around the equator; only B is within 50 km of (0, 0)
pub fn stations() -> WeatherTable {
    vec![
        WeatherStation::new(1.0, 0.0, 15.0, 1010.0, 30.0),
        WeatherStation::new(0.2, 0.0, 12.0, 1013.0, 10.0),
        WeatherStation::new(-1.0, 0.5, 18.0, 1008.0, 40.0),
    ]
    .into_iter()
    .collect()
}

pub fn app_with(predictor: PowerPredictor, table: WeatherTable) -> Router {
    let service = WindPowerService::new(predictor, table, SiteSearch::default());
    api::router(AppState::from_parts(Config::default(), service))
}

pub fn app() -> Router {
    app_with(PowerPredictor::new(Arc::new(wind_model())), stations())
}

pub fn write_csv(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

pub async fn post_json(app: Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
