//! Hour-of-day peak load risk classification.

use crate::error::AnalysisResult;
use crate::frame::TimeSeriesFrame;
use crate::segment::{hourly_profile, HourlyProfile};
use crate::stats::mean_and_sample_std;
use serde::Serialize;
use tracing::info;

/// One hour whose mean load exceeds the risk threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighRiskHour {
    pub hour: u32,
    pub mean_load: f64,
}

/// Hours classified as high-risk, ascending by hour.
///
/// Only [`identify_high_risk_hours`] can produce this value, which is what
/// demand balancing requires as proof that risk identification ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HighRiskHours {
    hours: Vec<HighRiskHour>,
}

impl HighRiskHours {
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> + '_ {
        self.hours.iter().map(|h| h.hour)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighRiskHour> {
        self.hours.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub profile: HourlyProfile,
    pub threshold: f64,
    pub high_risk: HighRiskHours,
}

/// Flag hours whose mean load strictly exceeds mean + sample std of all
/// hourly means.
///
/// Fails with `InsufficientData` when fewer than two distinct hours occur.
pub fn identify_high_risk_hours(frame: &TimeSeriesFrame) -> AnalysisResult<RiskAssessment> {
    let profile = hourly_profile(frame);
    let (mean, std) = mean_and_sample_std(&profile.means(), "hourly load profile")?;
    let threshold = mean + std;

    let hours: Vec<HighRiskHour> = profile
        .iter()
        .filter(|segment| segment.mean_load > threshold)
        .map(|segment| HighRiskHour {
            hour: segment.key,
            mean_load: segment.mean_load,
        })
        .collect();

    info!(
        threshold,
        high_risk = hours.len(),
        hours_observed = profile.len(),
        "peak load risk identified"
    );
    Ok(RiskAssessment {
        profile,
        threshold,
        high_risk: HighRiskHours { hours },
    })
}

#[cfg(test)]
pub(crate) fn high_risk_hours_for_test(hours: &[u32]) -> HighRiskHours {
    HighRiskHours {
        hours: hours
            .iter()
            .map(|hour| HighRiskHour {
                hour: *hour,
                mean_load: 0.0,
            })
            .collect(),
    }
}
