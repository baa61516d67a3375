//! Power prediction endpoint

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    api::error::ApiError,
    domain::{OptimalLocation, PredictionInput},
    service::{AppState, PowerAssessment},
};

/// Fully parsed prediction request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictRequest {
    pub lat: f64,
    pub lon: f64,
    pub windmills: i64,
    pub temperature: f64,
    pub pressure: f64,
    pub wind_speed: f64,
}

impl PredictRequest {
    /// Parse all six fields from a JSON body; any failure rejects the whole request.
    ///
    /// Numbers may arrive as JSON numbers or as numeric strings (form values).
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidInput)?;
        let fields = value.as_object().ok_or(ApiError::InvalidInput)?;
        Self::from_fields(fields).ok_or(ApiError::InvalidInput)
    }

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            lat: parse_float(fields.get("lat"))?,
            lon: parse_float(fields.get("lon"))?,
            windmills: parse_int(fields.get("windmills"))?,
            temperature: parse_float(fields.get("temperature"))?,
            pressure: parse_float(fields.get("pressure"))?,
            wind_speed: parse_float(fields.get("windSpeed"))?,
        })
    }

    pub fn prediction_input(&self) -> PredictionInput {
        PredictionInput::new(self.temperature, self.pressure, self.wind_speed, self.windmills)
    }
}

fn parse_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integers, floats truncated toward zero, or integer literals in strings.
fn parse_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub temperature: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub predicted_power: f64,
    pub place_name: String,
    pub optimal_location: Option<OptimalLocation>,
}

impl From<PowerAssessment> for PredictResponse {
    fn from(a: PowerAssessment) -> Self {
        Self {
            temperature: a.input.temperature,
            wind_speed: a.input.wind_speed,
            pressure: a.input.pressure,
            predicted_power: a.predicted_power,
            place_name: a.place_name.to_string(),
            optimal_location: a.optimal_location,
        }
    }
}

/// POST /api/predict_power/ - Predict output here and find the best nearby station
pub async fn predict_power(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let request = PredictRequest::from_json(&body)?;
    tracing::info!(
        lat = request.lat,
        lon = request.lon,
        windmills = request.windmills,
        "power prediction requested"
    );

    let assessment = state
        .service
        .assess(request.lat, request.lon, request.prediction_input());

    Ok(Json(assessment.into()))
}
