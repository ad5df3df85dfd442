//! Trailing moving averages of total load.

use crate::frame::TimeSeriesFrame;
use serde::Serialize;

pub const SHORT_WINDOW: usize = 7;
pub const LONG_WINDOW: usize = 30;

/// Short and long trailing averages aligned with the frame rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingTrend {
    pub short: Vec<Option<f64>>,
    pub long: Vec<Option<f64>>,
}

pub fn rolling_trend(frame: &TimeSeriesFrame) -> RollingTrend {
    let loads = frame.total_loads();
    RollingTrend {
        short: trailing_mean(&loads, SHORT_WINDOW),
        long: trailing_mean(&loads, LONG_WINDOW),
    }
}

/// Mean of each value and the `window - 1` values before it.
///
/// The first `window - 1` positions have no value. Each window is summed
/// from scratch so results carry no accumulated rounding drift.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut out = vec![None; values.len().min(window - 1)];
    out.extend(
        values
            .windows(window)
            .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
    );
    out
}
