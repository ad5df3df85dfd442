//! Per-zone efficiency scores relative to the most heavily loaded zone.

use crate::error::{AnalysisError, AnalysisResult};
use crate::frame::{TimeSeriesFrame, Zone};
use serde::Serialize;
use tracing::debug;

/// Score span below 100; the most heavily loaded zone lands at `100 - SCORE_SPAN`.
pub const SCORE_SPAN: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneScore {
    pub zone: Zone,
    pub mean_load: f64,
    pub score: f64,
}

/// Score every zone as `100 - (mean / max_mean) * 40`, rounded to 2 decimals.
///
/// Output is in fixed Zone1, Zone2, Zone3 order. The zone with the largest
/// mean always scores exactly 60.00.
pub fn score_zones(frame: &TimeSeriesFrame) -> AnalysisResult<Vec<ZoneScore>> {
    if frame.is_empty() {
        return Err(AnalysisError::DegenerateInput(
            "no readings to score zones from".to_string(),
        ));
    }
    let rows = frame.len() as f64;
    let means = Zone::ALL.map(|zone| frame.zone_loads(zone).sum::<f64>() / rows);
    let max_mean = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_mean <= 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "every zone has zero mean load".to_string(),
        ));
    }

    let scores: Vec<ZoneScore> = Zone::ALL
        .iter()
        .zip(means)
        .map(|(zone, mean_load)| ZoneScore {
            zone: *zone,
            mean_load,
            score: round2(100.0 - (mean_load / max_mean) * SCORE_SPAN),
        })
        .collect();
    debug!(?scores, "zone efficiency scored");
    Ok(scores)
}

/// Round to two decimals, halves away from zero on the scaled value.
///
/// Exact binary halves such as 0.125 round up to 0.13 here; a half-to-even
/// rounding would give 0.12. Scores can therefore differ from such tools by
/// 0.01 on exact ties.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
