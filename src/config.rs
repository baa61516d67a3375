use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ml::TrainingConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub search: SearchConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Browser origin allowed to call the API when CORS is enabled
    pub cors_origin: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            enable_cors: true,
            cors_origin: "http://localhost:5173".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Locations of the read-only inputs shared by the service and the trainer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub weather_csv: PathBuf,
    pub model_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            weather_csv: PathBuf::from("models/daily_weather_data.csv"),
            model_path: PathBuf::from("models/wind_model.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { radius_km: 50.0 }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("WPS__").split("__"))
    }

    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Ok(Self::figment().extract()?)
    }
}
