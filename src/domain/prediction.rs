use serde::{Deserialize, Serialize};

use super::WeatherStation;

/// Weather conditions and farm size a prediction is made for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub temperature: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    /// Not checked for positivity; zero and negative counts go to the model as-is
    pub windmill_count: i64,
}

impl PredictionInput {
    pub fn new(temperature: f64, pressure: f64, wind_speed: f64, windmill_count: i64) -> Self {
        Self {
            temperature,
            pressure,
            wind_speed,
            windmill_count,
        }
    }

    /// Conditions recorded at a station, for a farm of `windmill_count` turbines
    pub fn at_station(station: &WeatherStation, windmill_count: i64) -> Self {
        Self::new(
            station.avg_temperature,
            station.pressure,
            station.wind_speed,
            windmill_count,
        )
    }
}

/// Outcome of running the power model once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerEstimate {
    /// Predicted output in MW, already rounded to two decimals
    Available(f64),
    /// No model loaded, or inference failed
    Unavailable,
}

impl PowerEstimate {
    /// Collapses the estimate to the wire value; `Unavailable` becomes `0.0`.
    pub fn megawatts(self) -> f64 {
        match self {
            PowerEstimate::Available(mw) => mw,
            PowerEstimate::Unavailable => 0.0,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, PowerEstimate::Available(_))
    }
}

/// Round to two decimals on the exact binary value, ties to even.
pub fn round_megawatts(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Best station found by the site search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalLocation {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub temperature: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    #[serde(rename = "predictedPower")]
    pub predicted_power: f64,
}

impl OptimalLocation {
    pub fn from_station(station: &WeatherStation, predicted_power: f64) -> Self {
        Self {
            latitude: station.latitude,
            longitude: station.longitude,
            temperature: station.avg_temperature,
            wind_speed: station.wind_speed,
            pressure: station.pressure,
            predicted_power,
        }
    }
}
