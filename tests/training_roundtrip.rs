mod common;

use std::path::Path;
use std::sync::Arc;

use common::write_csv;
use wind_power_service::config::Config;
use wind_power_service::ml::{LinearRegressionModel, MLModel, ModelTrainer, PowerPredictor, TrainingConfig};
use wind_power_service::ml::FeatureVector;
use wind_power_service::domain::PredictionInput;
use wind_power_service::service::AppState;
use wind_power_service::weather::{read_records, DatasetError};

fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from("date,tavg,pres,wspd,Latitude,Longitude\n");
    for i in 0..rows {
        let tavg = 2.0 + (i % 13) as f64 * 1.5;
        let pres = 995.0 + (i % 19) as f64;
        let wspd = 3.0 + (i % 23) as f64 * 0.9;
        let lat = 51.0 + (i % 7) as f64 * 0.05;
        let lon = 4.0 + (i % 5) as f64 * 0.05;
        csv.push_str(&format!("2024-01-{:02},{tavg},{pres},{wspd},{lat},{lon}\n", i % 28 + 1));
    }
    // An incomplete row that must be dropped
    csv.push_str("2024-02-01,,1000.0,5.0,51.0,4.0\n");
    csv
}

fn train(dir: &Path) -> LinearRegressionModel {
    let data = dir.join("daily_weather_data.csv");
    write_csv(&data, &synthetic_csv(200));
    let set = read_records(&data).unwrap();
    ModelTrainer::new(TrainingConfig::default()).train(&set).unwrap().model
}

#[test]
fn test_training_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let a = train(dir.path());
    let b = train(dir.path());

    assert_eq!(a.coefficients, b.coefficients);
    assert_eq!(a.intercept, b.intercept);
    assert_eq!(a.metadata.validation_metrics, b.metadata.validation_metrics);
    assert_eq!(a.metadata.training_samples, 160);
    assert_eq!(a.metadata.test_samples, 40);
}

#[test]
fn test_trained_model_learns_wind_relation() {
    let dir = tempfile::tempdir().unwrap();
    let model = train(dir.path());

    assert!((model.coefficient("wspd").unwrap() - 1.2).abs() < 0.05);
    assert!(model.coefficient("windmills").unwrap().abs() < 1e-9);
    assert!(model.metadata.validation_metrics.unwrap().r2 > 0.95);
}

#[test]
fn test_saved_model_predicts_like_in_memory_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = train(dir.path());
    let path = dir.path().join("out").join("wind_model.json");
    model.save(&path).unwrap();

    let reloaded = LinearRegressionModel::load(&path).unwrap();
    let before = PowerPredictor::new(Arc::new(model.clone()));
    let after = PowerPredictor::load_or_unavailable(&path);
    assert!(after.is_loaded());

    for (t, p, w, n) in [(20.0, 1013.0, 5.0, 10), (-3.5, 990.2, 17.3, 1), (31.0, 1021.0, 0.0, 0)] {
        let fv = FeatureVector::from_input(&PredictionInput::new(t, p, w, n));
        let raw_before = model.predict(&fv).unwrap();
        let raw_after = reloaded.predict(&fv).unwrap();
        assert!((raw_before - raw_after).abs() < 1e-9);
        assert_eq!(before.predict(t, p, w, n), after.predict(t, p, w, n));
    }
}

#[test]
fn test_service_loads_trained_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let model = train(dir.path());

    let mut cfg = Config::default();
    cfg.data.weather_csv = dir.path().join("daily_weather_data.csv");
    cfg.data.model_path = dir.path().join("wind_model.json");
    model.save(&cfg.data.model_path).unwrap();

    let state = AppState::new(cfg);
    assert!(state.service.predictor().is_loaded());
    assert_eq!(state.service.stations().len(), 200);

    let best = state.service.find_best(51.1, 4.1, 3).unwrap();
    let best_power = best.predicted_power;
    for station in state.service.stations().iter() {
        let d = wind_power_service::optimizer::geodesic_distance_km(51.1, 4.1, station.latitude, station.longitude);
        if d <= 50.0 {
            let p = state
                .service
                .predict(&PredictionInput::at_station(station, 3));
            assert!(p <= best_power);
        }
    }
}

#[test]
fn test_missing_dataset_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_records(&dir.path().join("daily_weather_data.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::Open { .. }));
}

#[test]
fn test_dataset_with_target_column_uses_it() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("with_target.csv");
    let mut csv = String::from("tavg,pres,wspd,Latitude,Longitude,power_output\n");
    for i in 0..30 {
        let wspd = 1.0 + i as f64;
        csv.push_str(&format!("10.0,{},{wspd},50.0,4.0,{}\n", 1000 + i % 3, 2.0 * wspd + 1.0));
    }
    write_csv(&data, &csv);

    let set = read_records(&data).unwrap();
    assert!(set.has_power_output);
    let model = ModelTrainer::new(TrainingConfig::default()).train(&set).unwrap().model;

    assert!((model.coefficient("wspd").unwrap() - 2.0).abs() < 1e-6);
    assert!(model.coefficient("tavg").unwrap().abs() < 1e-9);
}
