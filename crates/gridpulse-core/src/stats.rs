//! Descriptive statistics shared by the detectors.

use crate::error::{AnalysisError, AnalysisResult};

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean and sample standard deviation (divisor n − 1).
pub fn mean_and_sample_std(values: &[f64], context: &'static str) -> AnalysisResult<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData {
            context,
            required: 2,
            found: n,
        });
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok((mean, (sum_sq / (n - 1) as f64).sqrt()))
}
