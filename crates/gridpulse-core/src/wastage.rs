//! Global deviation-based wastage flags and the shared load baseline.

use crate::error::AnalysisResult;
use crate::frame::TimeSeriesFrame;
use crate::stats::mean_and_sample_std;
use serde::Serialize;
use tracing::info;

/// Rows above `mean + WASTAGE_SIGMA * std` are wastage anomalies.
pub const WASTAGE_SIGMA: f64 = 2.0;

/// Global mean and sample std of total load.
///
/// Only [`detect_wastage`] can construct one, so every consumer of the
/// baseline works from the same statistics the wastage flags were built on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WastageBaseline {
    mean: f64,
    std: f64,
}

impl WastageBaseline {
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    pub fn threshold(&self) -> f64 {
        self.mean + WASTAGE_SIGMA * self.std
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WastageReport {
    pub baseline: WastageBaseline,
    pub threshold: f64,
    pub flagged: usize,
}

/// Compute the baseline and write the `wastage_anomaly` column.
///
/// Fails with `InsufficientData` on fewer than two rows.
pub fn detect_wastage(frame: &mut TimeSeriesFrame) -> AnalysisResult<WastageReport> {
    let loads = frame.total_loads();
    let (mean, std) = mean_and_sample_std(&loads, "wastage baseline")?;
    let baseline = WastageBaseline { mean, std };
    let threshold = baseline.threshold();

    let flags: Vec<bool> = loads.iter().map(|load| *load > threshold).collect();
    let flagged = flags.iter().filter(|flag| **flag).count();
    frame.set_wastage_anomaly(flags);

    info!(mean, std, threshold, flagged, "wastage baseline computed");
    Ok(WastageReport {
        baseline,
        threshold,
        flagged,
    })
}
