//! ML Model Training Pipeline
//!
//! Offline training of the power model from the weather dataset.

use super::{FeatureVector, LinearRegressionModel, ModelMetadata, ValidationMetrics, FEATURE_NAMES};
use crate::weather::RecordSet;
use anyhow::{anyhow, Result};
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Windmill count assigned to every historical row
const HISTORICAL_WINDMILLS: f64 = 1.0;

/// Training Dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDataset {
    pub features: Vec<FeatureVector>,
    pub targets: Vec<f64>,
}

impl TrainingDataset {
    pub fn new(features: Vec<FeatureVector>, targets: Vec<f64>) -> Result<Self> {
        if features.len() != targets.len() {
            anyhow::bail!(
                "Feature and target count mismatch: {} features, {} targets",
                features.len(),
                targets.len()
            );
        }
        Ok(Self { features, targets })
    }

    /// Build `{tavg, pres, wspd, windmills=1}` rows from the dataset.
    ///
    /// Rows missing a required field are skipped. When the file has no
    /// `power_output` column the target is synthesized as
    /// `wspd * windmills * power_per_ms` plus gaussian noise drawn from `rng`;
    /// otherwise rows with an empty target cell are skipped.
    pub fn from_records<R: Rng + ?Sized>(
        set: &RecordSet,
        config: &TrainingConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|e| anyhow!("Invalid noise standard deviation {}: {}", config.noise_std, e))?;
        let names: Vec<String> = FEATURE_NAMES.iter().map(|n| n.to_string()).collect();

        let mut features = Vec::new();
        let mut targets = Vec::new();
        for record in &set.records {
            let Some(station) = record.station() else {
                continue;
            };
            let target = if set.has_power_output {
                match record.power_output {
                    Some(value) => value,
                    None => continue,
                }
            } else {
                station.wind_speed * HISTORICAL_WINDMILLS * config.power_per_ms
                    + noise.sample(rng)
            };

            features.push(FeatureVector {
                features: vec![
                    station.avg_temperature,
                    station.pressure,
                    station.wind_speed,
                    HISTORICAL_WINDMILLS,
                ],
                feature_names: names.clone(),
            });
            targets.push(target);
        }

        Self::new(features, targets)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Shuffle, then hold out `ceil(test_ratio * n)` rows (at least one) for testing.
    ///
    /// Returns `(train, test)`.
    pub fn split<R: Rng + ?Sized>(
        &self,
        test_ratio: f64,
        rng: &mut R,
    ) -> Result<(TrainingDataset, TrainingDataset)> {
        if test_ratio <= 0.0 || test_ratio >= 1.0 {
            anyhow::bail!("Test ratio must be between 0 and 1");
        }
        if self.len() < 2 {
            anyhow::bail!("Need at least 2 samples to split, got {}", self.len());
        }

        let n_test = ((self.len() as f64 * test_ratio).ceil() as usize).clamp(1, self.len() - 1);

        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);

        let pick = |idx: &[usize]| TrainingDataset {
            features: idx.iter().map(|&i| self.features[i].clone()).collect(),
            targets: idx.iter().map(|&i| self.targets[i]).collect(),
        };

        let test = pick(&order[..n_test]);
        let train = pick(&order[n_test..]);
        Ok((train, test))
    }
}

/// Training Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Seed for target noise and the train/test shuffle
    pub seed: u64,
    pub test_ratio: f64,
    /// Standard deviation of the noise added to synthesized targets
    pub noise_std: f64,
    /// MW per unit of wind speed per windmill, for synthesized targets
    pub power_per_ms: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            noise_std: 0.5,
            power_per_ms: 1.2,
        }
    }
}

/// Fitted model plus how it did on the held-out rows
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub model: LinearRegressionModel,
    pub metrics: ValidationMetrics,
    pub train_samples: usize,
    pub test_samples: usize,
}

/// Model Trainer
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Full pipeline: build rows, split, fit on the training part, score the rest.
    pub fn train(&self, set: &RecordSet) -> Result<TrainingReport> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let dataset = TrainingDataset::from_records(set, &self.config, &mut rng)?;
        info!(
            rows = set.records.len(),
            usable_rows = dataset.len(),
            synthesized_target = !set.has_power_output,
            "training dataset prepared"
        );

        let (train, test) = dataset.split(self.config.test_ratio, &mut rng)?;
        let mut model = self.fit(&train)?;

        let predictions: Vec<f64> = test
            .features
            .iter()
            .map(|f| model.evaluate_row(&f.features))
            .collect();
        let metrics = self.calculate_metrics(&predictions, &test.targets)?;

        model.metadata.test_samples = test.len();
        model.metadata.validation_metrics = Some(metrics);

        Ok(TrainingReport {
            model,
            metrics,
            train_samples: train.len(),
            test_samples: test.len(),
        })
    }

    /// Calculate validation metrics
    pub fn calculate_metrics(&self, predictions: &[f64], targets: &[f64]) -> Result<ValidationMetrics> {
        if predictions.len() != targets.len() {
            anyhow::bail!("Prediction and target count mismatch");
        }

        if predictions.is_empty() {
            anyhow::bail!("No predictions to evaluate");
        }

        let n = predictions.len() as f64;

        let mae: f64 = predictions
            .iter()
            .zip(targets.iter())
            .map(|(p, t)| (p - t).abs())
            .sum::<f64>()
            / n;

        let ss_res: f64 = predictions
            .iter()
            .zip(targets.iter())
            .map(|(p, t)| (t - p).powi(2))
            .sum();
        let mse = ss_res / n;

        let mean_target: f64 = targets.iter().sum::<f64>() / n;
        let ss_tot: f64 = targets.iter().map(|t| (t - mean_target).powi(2)).sum();

        // Constant targets: perfect fit scores 1, anything else 0
        let r2 = if ss_tot.abs() < 1e-12 {
            if ss_res.abs() < 1e-12 { 1.0 } else { 0.0 }
        } else {
            1.0 - (ss_res / ss_tot)
        };

        Ok(ValidationMetrics::new(mse, mae, r2))
    }

    /// Ordinary least squares with intercept.
    ///
    /// Columns are centered and the centered system is solved through SVD,
    /// which yields the minimum-norm solution: a constant column gets a zero
    /// coefficient and its contribution lands in the intercept.
    pub fn fit(&self, dataset: &TrainingDataset) -> Result<LinearRegressionModel> {
        if dataset.is_empty() {
            anyhow::bail!("Cannot train on empty dataset");
        }

        let n_samples = dataset.len();
        let feature_names = dataset.features[0].feature_names.clone();
        let n_features = feature_names.len();
        if dataset
            .features
            .iter()
            .any(|f| f.len() != n_features || f.feature_names != feature_names)
        {
            anyhow::bail!("All feature vectors must share the same feature names");
        }

        let n = n_samples as f64;
        let x_means: Vec<f64> = (0..n_features)
            .map(|j| dataset.features.iter().map(|f| f.features[j]).sum::<f64>() / n)
            .collect();
        let y_mean = dataset.targets.iter().sum::<f64>() / n;

        let x = DMatrix::from_fn(n_samples, n_features, |i, j| {
            dataset.features[i].features[j] - x_means[j]
        });
        let y = DVector::from_iterator(n_samples, dataset.targets.iter().map(|t| t - y_mean));

        let svd = x.svd(true, true);
        let max_singular = svd.singular_values.max();
        let eps = max_singular * n_samples.max(n_features) as f64 * f64::EPSILON;
        debug!(?eps, singular_values = ?svd.singular_values.as_slice(), "solving least squares");

        let solution = svd
            .solve(&y, eps)
            .map_err(|e| anyhow!("Least squares solve failed: {}", e))?;
        let coefficients: Vec<f64> = solution.iter().copied().collect();

        let intercept = y_mean
            - coefficients
                .iter()
                .zip(x_means.iter())
                .map(|(c, m)| c * m)
                .sum::<f64>();

        if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            anyhow::bail!("Least squares produced non-finite coefficients");
        }

        let metadata = ModelMetadata {
            model_id: format!("wind_linear_{}", uuid::Uuid::new_v4()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: chrono::Utc::now(),
            training_samples: n_samples,
            test_samples: 0,
            validation_metrics: None,
        };

        LinearRegressionModel::new(feature_names, coefficients, intercept, metadata)
    }
}
