use serde::{Deserialize, Serialize};

/// One row of the weather-station table.
///
/// Stations have no identity beyond their position in the table they were
/// loaded into; two stations with identical values are still distinct rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherStation {
    pub latitude: f64,
    pub longitude: f64,
    /// Average daily temperature (°C)
    pub avg_temperature: f64,
    /// Sea-level air pressure (hPa)
    pub pressure: f64,
    /// Average wind speed (km/h in the source dataset)
    pub wind_speed: f64,
}

impl WeatherStation {
    pub fn new(
        latitude: f64,
        longitude: f64,
        avg_temperature: f64,
        pressure: f64,
        wind_speed: f64,
    ) -> Self {
        Self {
            latitude,
            longitude,
            avg_temperature,
            pressure,
            wind_speed,
        }
    }
}
