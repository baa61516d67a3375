use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::WeatherStation;

/// Columns every dataset must carry, in the spelling used by the source file
pub const REQUIRED_COLUMNS: [&str; 5] = ["tavg", "pres", "wspd", "Latitude", "Longitude"];

/// Optional training target column
pub const POWER_OUTPUT_COLUMN: &str = "power_output";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("malformed dataset row: {0}")]
    Csv(#[from] csv::Error),
}

/// Empty, unparseable and non-finite (`NaN`, `inf`) cells all read as missing.
fn finite_option<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = csv::invalid_option(de)?;
    Ok(value.filter(|v| v.is_finite()))
}

/// A raw dataset row. Any cell may be absent or unparseable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherRecord {
    #[serde(default, deserialize_with = "finite_option")]
    pub tavg: Option<f64>,
    #[serde(default, deserialize_with = "finite_option")]
    pub pres: Option<f64>,
    #[serde(default, deserialize_with = "finite_option")]
    pub wspd: Option<f64>,
    #[serde(rename = "Latitude", default, deserialize_with = "finite_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "finite_option")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "finite_option")]
    pub power_output: Option<f64>,
}

impl WeatherRecord {
    /// The station this row describes, if every required field is present.
    pub fn station(&self) -> Option<WeatherStation> {
        Some(WeatherStation::new(
            self.latitude?,
            self.longitude?,
            self.tavg?,
            self.pres?,
            self.wspd?,
        ))
    }
}

/// Every row of a dataset plus whether it carries a target column.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub records: Vec<WeatherRecord>,
    pub has_power_output: bool,
}

/// Read all rows of the CSV at `path`, checking the header for the required columns.
pub fn read_records(path: &Path) -> Result<RecordSet, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(DatasetError::MissingColumn(missing.to_string()));
    }
    let has_power_output = headers.iter().any(|h| h == POWER_OUTPUT_COLUMN);

    let mut records = Vec::new();
    for result in rdr.records() {
        let mut row = result?;
        // short rows read as missing trailing cells, overflow cells are dropped
        row.truncate(headers.len());
        while row.len() < headers.len() {
            row.push_field("");
        }
        let record: WeatherRecord = row.deserialize(Some(&headers))?;
        records.push(record);
    }

    Ok(RecordSet {
        records,
        has_power_output,
    })
}
