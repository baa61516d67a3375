//! Process-wide service state
//!
//! The model and the weather table are loaded once in [`AppState::new`] and
//! shared read-only by every request.

use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::domain::{OptimalLocation, PredictionInput};
use crate::ml::PowerPredictor;
use crate::optimizer::SiteSearch;
use crate::weather::WeatherTable;

/// Placeholder place name echoed for user-supplied coordinates
pub const USER_PLACE_NAME: &str = "N/A (provided by user)";

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub service: Arc<WindPowerService>,
}

impl AppState {
    /// Load the model and weather data named by `cfg`.
    ///
    /// Missing inputs are not fatal: an absent model predicts 0 and an
    /// unreadable dataset yields an empty table.
    pub fn new(cfg: Config) -> Self {
        let predictor = PowerPredictor::load_or_unavailable(&cfg.data.model_path);
        let stations = WeatherTable::load_or_empty(&cfg.data.weather_csv);
        let search = SiteSearch::new(cfg.search.radius_km);

        info!(
            model_loaded = predictor.is_loaded(),
            stations = stations.len(),
            radius_km = search.radius_km(),
            "service state initialized"
        );

        Self::from_parts(cfg, WindPowerService::new(predictor, stations, search))
    }

    pub fn from_parts(cfg: Config, service: WindPowerService) -> Self {
        Self {
            cfg: Arc::new(cfg),
            service: Arc::new(service),
        }
    }
}

/// Result of one assessment request, before it is shaped for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct PowerAssessment {
    pub input: PredictionInput,
    pub predicted_power: f64,
    pub place_name: &'static str,
    pub optimal_location: Option<OptimalLocation>,
}

#[derive(Debug)]
pub struct WindPowerService {
    predictor: PowerPredictor,
    stations: WeatherTable,
    search: SiteSearch,
}

impl WindPowerService {
    pub fn new(predictor: PowerPredictor, stations: WeatherTable, search: SiteSearch) -> Self {
        Self {
            predictor,
            stations,
            search,
        }
    }

    pub fn predictor(&self) -> &PowerPredictor {
        &self.predictor
    }

    pub fn stations(&self) -> &WeatherTable {
        &self.stations
    }

    pub fn search(&self) -> &SiteSearch {
        &self.search
    }

    pub fn predict(&self, input: &PredictionInput) -> f64 {
        self.predictor.estimate(input).megawatts()
    }

    pub fn find_best(&self, lat: f64, lon: f64, windmill_count: i64) -> Option<OptimalLocation> {
        self.search
            .find_best(&self.stations, &self.predictor, lat, lon, windmill_count)
    }

    /// Prediction for the user's conditions plus the best station near `(lat, lon)`.
    pub fn assess(&self, lat: f64, lon: f64, input: PredictionInput) -> PowerAssessment {
        let predicted_power = self.predict(&input);
        let optimal_location = self.find_best(lat, lon, input.windmill_count);
        PowerAssessment {
            input,
            predicted_power,
            place_name: USER_PLACE_NAME,
            optimal_location,
        }
    }
}
