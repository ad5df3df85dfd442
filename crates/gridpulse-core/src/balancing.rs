//! Qualitative demand balancing recommendations.

use crate::error::{AnalysisError, AnalysisResult};
use crate::frame::{PeakType, TimeSeriesFrame};
use crate::risk::HighRiskHours;
use crate::segment::peak_offpeak_means;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Peak mean above `off_peak_mean * SHIFT_RATIO` triggers the shift rule.
pub const SHIFT_RATIO: f64 = 1.15;
/// More high-risk hours than this triggers the stagger rule.
pub const STAGGER_HOUR_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ShiftToOffPeak,
    StaggerPeakUsage,
}

impl Recommendation {
    pub fn code(self) -> &'static str {
        match self {
            Recommendation::ShiftToOffPeak => "shift_to_off_peak",
            Recommendation::StaggerPeakUsage => "stagger_peak_usage",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::ShiftToOffPeak => write!(f, "Shift load to off-peak hours"),
            Recommendation::StaggerPeakUsage => write!(f, "Stagger usage during peak hours"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancingAdvice {
    pub peak_mean: f64,
    pub off_peak_mean: f64,
    pub high_risk_hours: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Evaluate both balancing rules; zero, one or both may fire.
///
/// Fails with `DegenerateInput` when either window has no readings or the
/// off-peak mean is zero.
pub fn advise(frame: &TimeSeriesFrame, high_risk: &HighRiskHours) -> AnalysisResult<BalancingAdvice> {
    let means = peak_offpeak_means(frame);
    let peak_mean = means.get(PeakType::Peak).ok_or_else(|| {
        AnalysisError::DegenerateInput("no readings fall inside the peak window".to_string())
    })?;
    let off_peak_mean = means.get(PeakType::OffPeak).ok_or_else(|| {
        AnalysisError::DegenerateInput("no readings fall outside the peak window".to_string())
    })?;
    if off_peak_mean == 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "off-peak mean load is zero".to_string(),
        ));
    }

    let mut recommendations = Vec::new();
    if peak_mean > off_peak_mean * SHIFT_RATIO {
        recommendations.push(Recommendation::ShiftToOffPeak);
    }
    if high_risk.len() > STAGGER_HOUR_LIMIT {
        recommendations.push(Recommendation::StaggerPeakUsage);
    }
    debug!(peak_mean, off_peak_mean, ?recommendations, "balancing rules evaluated");

    Ok(BalancingAdvice {
        peak_mean,
        off_peak_mean,
        high_risk_hours: high_risk.len(),
        recommendations,
    })
}
