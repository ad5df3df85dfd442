//! Z-score anomaly flags against the shared wastage baseline.

use crate::error::{AnalysisError, AnalysisResult};
use crate::frame::TimeSeriesFrame;
use crate::wastage::WastageBaseline;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

/// Rows with `|z| > Z_THRESHOLD` are statistical anomalies.
pub const Z_THRESHOLD: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalousReading {
    pub timestamp: NaiveDateTime,
    pub total_load: f64,
    pub z_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatAnomalyReport {
    pub flagged: usize,
    pub anomalies: Vec<AnomalousReading>,
}

/// Write `z_score` and `stat_anomaly` columns using `baseline`.
///
/// Calling this again with the same baseline rewrites identical columns.
pub fn detect_statistical_anomalies(
    frame: &mut TimeSeriesFrame,
    baseline: &WastageBaseline,
) -> AnalysisResult<StatAnomalyReport> {
    let std = baseline.std();
    if std == 0.0 {
        return Err(AnalysisError::DivisionByZero(
            "total load standard deviation is zero; z-scores are undefined".to_string(),
        ));
    }
    let mean = baseline.mean();

    let z_scores: Vec<f64> = frame
        .rows()
        .iter()
        .map(|row| (row.total_load - mean) / std)
        .collect();
    let flags: Vec<bool> = z_scores.iter().map(|z| z.abs() > Z_THRESHOLD).collect();

    let anomalies: Vec<AnomalousReading> = frame
        .rows()
        .iter()
        .zip(z_scores.iter().zip(&flags))
        .filter(|(_, (_, flagged))| **flagged)
        .map(|(row, (z, _))| AnomalousReading {
            timestamp: row.reading.timestamp,
            total_load: row.total_load,
            z_score: *z,
        })
        .collect();

    frame.set_statistical_columns(z_scores, flags);
    info!(flagged = anomalies.len(), "statistical anomalies detected");
    Ok(StatAnomalyReport {
        flagged: anomalies.len(),
        anomalies,
    })
}
