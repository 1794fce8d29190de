//! Wind farm registry loading.
//!
//! The registry is a header-ed CSV file with one farm per row:
//!
//! ```text
//! ID,Name,Overall capacity,Number of turbines,Country,Latitude,Longitude
//! ANH,Anholt,400.0,111,Denmark,56.6,11.21
//! ```
//!
//! Loading never fails from the caller's point of view: an unreadable file
//! yields an empty registry, and individual invalid rows are skipped.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::FarmRecord;

/// Errors that can occur while reading the registry file.
#[derive(Debug, Error)]
pub enum RecordSourceError {
    #[error("IO error reading registry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// A source of farm records for one dashboard build.
///
/// Implementations must not fail past this boundary: any internal problem is
/// logged and surfaces as an empty sequence.
pub trait RecordSource: Send + Sync {
    fn load(&self) -> Vec<FarmRecord>;
}

/// One registry row, with the spreadsheet's column names.
#[derive(Debug, Deserialize)]
struct RegistryRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Overall capacity")]
    overall_capacity: f64,
    #[serde(rename = "Number of turbines")]
    number_of_turbines: u32,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

impl TryFrom<RegistryRow> for FarmRecord {
    type Error = RecordSourceError;

    fn try_from(row: RegistryRow) -> Result<Self, Self::Error> {
        let id = row.id.trim().to_string();
        if id.is_empty() {
            return Err(invalid("ID", "must not be empty"));
        }
        if !row.overall_capacity.is_finite() || row.overall_capacity < 0.0 {
            return Err(invalid(
                "Overall capacity",
                format!("{} is not a non-negative number", row.overall_capacity),
            ));
        }
        if !(-90.0..=90.0).contains(&row.latitude) {
            return Err(invalid(
                "Latitude",
                format!("{} is outside [-90, 90]", row.latitude),
            ));
        }
        if !(-180.0..=180.0).contains(&row.longitude) {
            return Err(invalid(
                "Longitude",
                format!("{} is outside [-180, 180]", row.longitude),
            ));
        }

        Ok(FarmRecord {
            id,
            name: row.name,
            country: row.country,
            capacity_mw: row.overall_capacity,
            turbine_count: row.number_of_turbines,
            latitude: row.latitude,
            longitude: row.longitude,
        })
    }
}

fn invalid(field: &str, message: impl Into<String>) -> RecordSourceError {
    RecordSourceError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Parse registry CSV from any reader, skipping rows that are malformed or
/// violate the record invariants.
///
/// Fails only when the input as a whole is unreadable (e.g. missing header).
pub fn parse_registry<R: std::io::Read>(reader: R) -> Result<Vec<FarmRecord>, RecordSourceError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    // Surface a broken header as a whole-file error rather than per-row noise.
    rdr.headers()?;

    let mut records = Vec::new();
    for (index, result) in rdr.deserialize::<RegistryRow>().enumerate() {
        // Header is line 1, first data row is line 2.
        let line = index + 2;
        match result
            .map_err(RecordSourceError::from)
            .and_then(FarmRecord::try_from)
        {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping registry row at line {}: {}", line, e),
        }
    }

    Ok(records)
}

/// Read and parse a registry file from disk.
pub fn read_registry_file(path: &Path) -> Result<Vec<FarmRecord>, RecordSourceError> {
    let file = std::fs::File::open(path)?;
    parse_registry(std::io::BufReader::new(file))
}

/// Registry backed by a CSV file on disk, re-read on every load.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvRecordSource {
    fn load(&self) -> Vec<FarmRecord> {
        if !self.path.exists() {
            tracing::error!("Registry file not found: {}", self.path.display());
            return Vec::new();
        }

        tracing::info!("Loading wind farm registry from {}", self.path.display());

        match read_registry_file(&self.path) {
            Ok(records) if records.is_empty() => {
                tracing::warn!("Registry file {} has no valid rows", self.path.display());
                records
            }
            Ok(records) => {
                tracing::info!("Loaded {} wind farms", records.len());
                records
            }
            Err(e) => {
                tracing::error!(
                    "Failed to load registry file {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}
