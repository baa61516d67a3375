//! Weather-station dataset
//!
//! The service and the offline trainer read the same delimited file. The
//! service keeps only complete rows as an immutable [`WeatherTable`]; the
//! trainer additionally looks at the optional `power_output` column.

pub mod dataset;

pub use dataset::{read_records, DatasetError, RecordSet, WeatherRecord, REQUIRED_COLUMNS};

use std::path::Path;
use tracing::{info, warn};

use crate::domain::WeatherStation;

/// Read-only station table, in file order.
#[derive(Debug, Clone, Default)]
pub struct WeatherTable {
    stations: Vec<WeatherStation>,
}

impl WeatherTable {
    pub fn new(stations: Vec<WeatherStation>) -> Self {
        Self { stations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every complete row from `path`.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let records = read_records(path)?.records;
        let total = records.len();
        let stations: Vec<WeatherStation> =
            records.iter().filter_map(WeatherRecord::station).collect();
        info!(
            path = %path.display(),
            rows = total,
            valid_rows = stations.len(),
            "weather data loaded"
        );
        Ok(Self { stations })
    }

    /// Like [`WeatherTable::load`], but a missing or unreadable file yields an
    /// empty table so the service can still start.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load weather data, continuing with an empty table");
                Self::empty()
            }
        }
    }

    pub fn stations(&self) -> &[WeatherStation] {
        &self.stations
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeatherStation> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<WeatherStation> for WeatherTable {
    fn from_iter<I: IntoIterator<Item = WeatherStation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_drops_incomplete_rows() {
        let file = write_csv(
            "station,tavg,pres,wspd,Latitude,Longitude\n\
             A,10.5,1012.0,15.0,52.0,5.0\n\
             B,,1010.0,12.0,52.1,5.1\n\
             C,9.0,1011.0,n/a,52.2,5.2\n\
             D,8.0,1009.0,20.0,52.3,5.3\n",
        );

        let table = WeatherTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.stations()[0], WeatherStation::new(52.0, 5.0, 10.5, 1012.0, 15.0));
        assert_eq!(table.stations()[1].latitude, 52.3);
    }

    #[test]
    fn test_bad_rows_do_not_empty_the_table() {
        let file = write_csv(
            "tavg,pres,wspd,Latitude,Longitude,station\n\
             10.5,1012.0,15.0,52.0,5.0,A\n\
             9.0,1011.0,14.0,52.1\n\
             NaN,1010.0,12.0,52.2,5.2,C\n\
             8.0,1009.0,20.0,52.3,5.3,D\n",
        );

        let table = WeatherTable::load_or_empty(file.path());
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|s| s.avg_temperature.is_finite()));
        assert_eq!(table.stations()[1].latitude, 52.3);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = WeatherTable::load_or_empty(&dir.path().join("nope.csv"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_column_degrades_to_empty() {
        let file = write_csv("tavg,pres,Latitude,Longitude\n10.0,1012.0,52.0,5.0\n");
        assert!(matches!(
            WeatherTable::load(file.path()),
            Err(DatasetError::MissingColumn(ref c)) if c == "wspd"
        ));
        assert!(WeatherTable::load_or_empty(file.path()).is_empty());
    }
}
