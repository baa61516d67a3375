//! Machine Learning Module
//!
//! Linear power model used by the prediction service:
//! - Named feature vectors built from weather conditions
//! - Ordinary least squares training (offline, see `bin/train_model.rs`)
//! - JSON persistence of the fitted model
//! - Inference with failures collapsed to [`PowerEstimate::Unavailable`]
//!
//! [`PowerEstimate::Unavailable`]: crate::domain::PowerEstimate::Unavailable

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::PredictionInput;

pub mod inference;
pub mod models;
pub mod training;

pub use inference::PowerPredictor;
pub use models::{LinearRegressionModel, MLModel};
pub use training::{ModelTrainer, TrainingConfig, TrainingDataset, TrainingReport};

/// Feature order the power model is trained and queried with
pub const FEATURE_NAMES: [&str; 4] = ["tavg", "pres", "wspd", "windmills"];

/// ML Model Metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub version: String,
    pub trained_at: chrono::DateTime<chrono::Utc>,
    pub training_samples: usize,
    pub test_samples: usize,
    /// Hold-out metrics; `None` when no test split was evaluated
    pub validation_metrics: Option<ValidationMetrics>,
}

/// Validation Metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub mse: f64,  // Mean Squared Error
    pub rmse: f64, // Root Mean Square Error
    pub mae: f64,  // Mean Absolute Error
    pub r2: f64,   // R-squared
}

impl ValidationMetrics {
    pub fn new(mse: f64, mae: f64, r2: f64) -> Self {
        Self {
            mse,
            rmse: mse.sqrt(),
            mae,
            r2,
        }
    }
}

/// Feature Vector for ML models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub features: Vec<f64>,
    pub feature_names: Vec<String>,
}

impl FeatureVector {
    pub fn new(features: Vec<f64>, feature_names: Vec<String>) -> Result<Self> {
        if features.len() != feature_names.len() {
            anyhow::bail!(
                "Feature count mismatch: {} features, {} names",
                features.len(),
                feature_names.len()
            );
        }
        Ok(Self {
            features,
            feature_names,
        })
    }

    /// Single-row vector `{tavg, pres, wspd, windmills}` for the power model
    pub fn from_input(input: &PredictionInput) -> Self {
        Self {
            features: vec![
                input.temperature,
                input.pressure,
                input.wind_speed,
                input.windmill_count as f64,
            ],
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
