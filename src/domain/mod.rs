//! Core domain types shared by the predictor, the site search and the API.

pub mod prediction;
pub mod station;

pub use prediction::{round_megawatts, OptimalLocation, PowerEstimate, PredictionInput};
pub use station::WeatherStation;
