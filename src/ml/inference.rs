//! ML Model Inference
//!
//! Runs the loaded power model for the service. Inference never fails from the
//! caller's point of view: a missing model or an inference error is logged and
//! reported as [`PowerEstimate::Unavailable`].

use super::{models::MLModel, FeatureVector, LinearRegressionModel, ModelMetadata};
use crate::domain::{round_megawatts, PowerEstimate, PredictionInput};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Process-wide power predictor; cheap to clone, immutable after construction.
#[derive(Clone)]
pub struct PowerPredictor {
    model: Option<Arc<dyn MLModel>>,
}

impl PowerPredictor {
    pub fn new(model: Arc<dyn MLModel>) -> Self {
        Self { model: Some(model) }
    }

    /// A predictor with no model; every estimate is unavailable.
    pub fn unavailable() -> Self {
        Self { model: None }
    }

    /// Load the model at `path`, falling back to [`PowerPredictor::unavailable`].
    pub fn load_or_unavailable(path: &Path) -> Self {
        match LinearRegressionModel::load(path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    model_id = %model.metadata.model_id,
                    trained_at = %model.metadata.trained_at,
                    "wind model loaded"
                );
                Self::new(Arc::new(model))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "wind model not available, predictions will be 0");
                Self::unavailable()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.model.as_ref().map(|m| m.metadata())
    }

    /// Run the model once, rounding the output to two decimals.
    pub fn estimate(&self, input: &PredictionInput) -> PowerEstimate {
        let Some(model) = &self.model else {
            debug!("wind model not loaded");
            return PowerEstimate::Unavailable;
        };

        let features = FeatureVector::from_input(input);
        match model.predict(&features) {
            Ok(value) => PowerEstimate::Available(round_megawatts(value)),
            Err(e) => {
                warn!(error = %e, ?input, "model prediction failed");
                PowerEstimate::Unavailable
            }
        }
    }

    /// Predicted output in MW, or `0.0` when unavailable.
    pub fn predict(
        &self,
        temperature: f64,
        pressure: f64,
        wind_speed: f64,
        windmill_count: i64,
    ) -> f64 {
        self.estimate(&PredictionInput::new(
            temperature,
            pressure,
            wind_speed,
            windmill_count,
        ))
        .megawatts()
    }
}

impl std::fmt::Debug for PowerPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerPredictor")
            .field("model_id", &self.metadata().map(|m| m.model_id.as_str()))
            .finish()
    }
}
