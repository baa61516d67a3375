use geo::{GeodesicDistance, Point};
use tracing::{debug, info};

use crate::domain::{OptimalLocation, PredictionInput};
use crate::ml::PowerPredictor;
use crate::weather::WeatherTable;

pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Distance on the WGS-84 ellipsoid between two `(lat, lon)` points, in km.
pub fn geodesic_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // geo points are (x = lon, y = lat)
    let a = Point::new(lon1, lat1);
    let b = Point::new(lon2, lat2);
    a.geodesic_distance(&b) / 1000.0
}

/// Linear scan over the station table for the best-scoring station in range.
#[derive(Debug, Clone, Copy)]
pub struct SiteSearch {
    radius_km: f64,
}

impl Default for SiteSearch {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS_KM)
    }
}

impl SiteSearch {
    pub fn new(radius_km: f64) -> Self {
        Self { radius_km }
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Station within the radius of `(lat, lon)` with the highest predicted
    /// output for `windmill_count` turbines.
    ///
    /// Stations are visited in table order and only a strictly higher score
    /// replaces the current best, so ties resolve to the earliest station.
    /// Returns `None` when no station is in range.
    pub fn find_best(
        &self,
        table: &WeatherTable,
        predictor: &PowerPredictor,
        lat: f64,
        lon: f64,
        windmill_count: i64,
    ) -> Option<OptimalLocation> {
        let mut best: Option<OptimalLocation> = None;
        let mut nearby = 0usize;

        for station in table.iter() {
            let distance = geodesic_distance_km(lat, lon, station.latitude, station.longitude);
            // NaN distances fall through here as well
            if !(distance <= self.radius_km) {
                continue;
            }
            nearby += 1;

            let power = predictor
                .estimate(&PredictionInput::at_station(station, windmill_count))
                .megawatts();
            if best.map_or(true, |b| power > b.predicted_power) {
                best = Some(OptimalLocation::from_station(station, power));
            }
        }

        debug!(nearby, radius_km = self.radius_km, "stations within search radius");

        match &best {
            Some(loc) => info!(
                lat = loc.latitude,
                lon = loc.longitude,
                predicted_power = loc.predicted_power,
                "best location found"
            ),
            None => info!(lat, lon, radius_km = self.radius_km, "no optimal location within radius"),
        }

        best
    }
}
