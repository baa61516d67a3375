//! Offline trainer for the wind power model.
//!
//! Reads the weather dataset named in the configuration, fits the linear
//! model, prints hold-out metrics and writes the model where the service
//! loads it from. Any failure, including a missing dataset, exits non-zero.

use anyhow::{Context, Result};
use tracing::info;
use wind_power_service::config::Config;
use wind_power_service::ml::ModelTrainer;
use wind_power_service::telemetry::{init_tracing, LogFormat};
use wind_power_service::weather::read_records;

fn main() -> Result<()> {
    init_tracing(LogFormat::Pretty);

    let cfg = Config::load()?;
    let data_path = &cfg.data.weather_csv;
    let model_path = &cfg.data.model_path;

    let records = read_records(data_path)
        .with_context(|| format!("{} could not be read", data_path.display()))?;

    let trainer = ModelTrainer::new(cfg.training.clone());
    let report = trainer.train(&records)?;

    info!(
        mse = report.metrics.mse,
        rmse = report.metrics.rmse,
        mae = report.metrics.mae,
        r2 = report.metrics.r2,
        train_samples = report.train_samples,
        test_samples = report.test_samples,
        "model evaluated on hold-out split"
    );
    println!("mean squared error = {}", report.metrics.mse);
    println!("r2 score = {}", report.metrics.r2);

    report.model.save(model_path)?;
    info!(path = %model_path.display(), model_id = %report.model.metadata.model_id, "model saved");
    println!("Model trained and saved to: {}", model_path.display());

    Ok(())
}
