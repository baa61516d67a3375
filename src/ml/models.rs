//! Power model definitions and persistence.

use super::{FeatureVector, ModelMetadata};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Trait for ML models
pub trait MLModel: Send + Sync {
    /// Predict a value from features
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Get model metadata
    fn metadata(&self) -> &ModelMetadata;
}

/// Ordinary least squares model over named features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub metadata: ModelMetadata,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
        metadata: ModelMetadata,
    ) -> Result<Self> {
        if feature_names.len() != coefficients.len() {
            anyhow::bail!(
                "Coefficient count mismatch: {} names, {} coefficients",
                feature_names.len(),
                coefficients.len()
            );
        }
        Ok(Self {
            metadata,
            feature_names,
            coefficients,
            intercept,
        })
    }

    /// Read a model previously written by [`LinearRegressionModel::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file {}", path.display()))?;
        let model: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to decode model file {}", path.display()))?;
        if model.feature_names.len() != model.coefficients.len() {
            anyhow::bail!(
                "Corrupt model file {}: {} feature names, {} coefficients",
                path.display(),
                model.feature_names.len(),
                model.coefficients.len()
            );
        }
        Ok(model)
    }

    /// Write the model as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create model file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write model file {}", path.display()))?;
        Ok(())
    }

    /// Raw (unrounded) evaluation of a feature row in training order.
    pub fn evaluate_row(&self, row: &[f64]) -> f64 {
        row.iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept
    }

    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.coefficients.get(i).copied())
    }
}

impl MLModel for LinearRegressionModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        if features.feature_names != self.feature_names {
            anyhow::bail!(
                "Feature names do not match model: expected {:?}, got {:?}",
                self.feature_names,
                features.feature_names
            );
        }

        let value = self.evaluate_row(&features.features);
        if !value.is_finite() {
            anyhow::bail!("Model produced a non-finite prediction ({})", value);
        }

        Ok(value)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
