//! CSV ingestion for zone power consumption exports.
//!
//! The file is read with polars and handed to the core as [`RawRow`]s;
//! timestamp parsing and value validation stay in
//! [`gridpulse_core::preprocess`].

use gridpulse_core::{RawRow, ZONE_COUNT};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("opening {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading CSV: {0}")]
    Polars(#[from] PolarsError),

    #[error("column '{column}' not found; available columns: {}", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
}

/// Column names of the timestamp and the three zone loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub timestamp: String,
    pub zones: [String; ZONE_COUNT],
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            timestamp: "Datetime".to_string(),
            zones: [
                "PowerConsumption_Zone1".to_string(),
                "PowerConsumption_Zone2".to_string(),
                "PowerConsumption_Zone3".to_string(),
            ],
        }
    }
}

/// Read a CSV export (header row required) into raw rows.
pub fn load_raw_rows(path: &Path, mapping: &ColumnMapping) -> Result<Vec<RawRow>, IngestError> {
    let df = read_csv(path)?;
    let rows = raw_rows_from_frame(&df, mapping)?;
    debug!(rows = rows.len(), path = %path.display(), "loaded readings");
    Ok(rows)
}

pub fn read_csv(path: &Path) -> Result<DataFrame, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CsvReader::new(file).has_header(true).finish()?)
}

/// Extract raw rows from an ingested frame.
///
/// Null or non-numeric zone cells become missing values, which the
/// preprocessor rejects with the offending row index.
pub fn raw_rows_from_frame(
    df: &DataFrame,
    mapping: &ColumnMapping,
) -> Result<Vec<RawRow>, IngestError> {
    let timestamps = require_column(df, &mapping.timestamp)?.cast(&DataType::Utf8)?;
    let zone_series = mapping
        .zones
        .iter()
        .map(|name| Ok(require_column(df, name)?.cast(&DataType::Float64)?))
        .collect::<Result<Vec<Series>, IngestError>>()?;

    let timestamps = timestamps.utf8()?;
    let zone1 = zone_series[0].f64()?;
    let zone2 = zone_series[1].f64()?;
    let zone3 = zone_series[2].f64()?;

    let rows = timestamps
        .into_iter()
        .zip(zone1.into_iter())
        .zip(zone2.into_iter())
        .zip(zone3.into_iter())
        .map(|(((ts, z1), z2), z3)| RawRow {
            timestamp: ts.unwrap_or_default().to_string(),
            zones: [z1, z2, z3],
        })
        .collect();
    Ok(rows)
}

fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, IngestError> {
    let names = df.get_column_names();
    if !names.iter().any(|c| *c == name) {
        return Err(IngestError::MissingColumn {
            column: name.to_string(),
            available: names.iter().map(|c| c.to_string()).collect(),
        });
    }
    Ok(df.column(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "Datetime,Temperature,PowerConsumption_Zone1,PowerConsumption_Zone2,PowerConsumption_Zone3";

    #[test]
    fn loads_source_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("powerconsumption.csv");
        fs::write(
            &path,
            format!(
                "{HEADER}\n1/1/2017 0:00,6.559,34055.6962,16128.87538,20240.96386\n1/1/2017 0:10,6.414,29814.68354,19375.07599,20131.08434\n"
            ),
        )
        .unwrap();

        let rows = load_raw_rows(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, "1/1/2017 0:00");
        assert_eq!(
            rows[1].zones,
            [Some(29814.68354), Some(19375.07599), Some(20131.08434)]
        );
    }

    #[test]
    fn empty_cells_become_missing_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gaps.csv");
        fs::write(
            &path,
            format!("{HEADER}\n1/1/2017 0:00,6.5,1.0,,3.0\n1/1/2017 0:10,6.4,1.5,2.5,3.5\n"),
        )
        .unwrap();

        let rows = load_raw_rows(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].zones[1], None);
        assert_eq!(rows[1].zones[1], Some(2.5));
    }

    #[test]
    fn integer_columns_are_widened() {
        let df = df![
            "ts" => &["2017-01-01 00:00:00", "2017-01-01 01:00:00"],
            "a" => &[1i64, 2],
            "b" => &[3i64, 4],
            "c" => &[5.5f64, 6.5],
        ]
        .unwrap();
        let mapping = ColumnMapping {
            timestamp: "ts".to_string(),
            zones: ["a".to_string(), "b".to_string(), "c".to_string()],
        };
        let rows = raw_rows_from_frame(&df, &mapping).unwrap();
        assert_eq!(rows[1].zones, [Some(2.0), Some(4.0), Some(6.5)]);
    }

    #[test]
    fn missing_column_lists_available_names() {
        let df = df!["Datetime" => &["2017-01-01"], "Zone1" => &[1.0f64]].unwrap();
        let err = raw_rows_from_frame(&df, &ColumnMapping::default()).unwrap_err();
        match err {
            IngestError::MissingColumn { column, available } => {
                assert_eq!(column, "PowerConsumption_Zone1");
                assert_eq!(available, vec!["Datetime".to_string(), "Zone1".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_csv(Path::new("/nonexistent/readings.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
