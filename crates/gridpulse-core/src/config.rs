//! Calendar parameters used while deriving per-row features.

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// Peak window and weekday/weekend split.
///
/// Both are conventions of the source data rather than physical constants, so
/// they are parameters here with the conventional values as defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// First hour of the peak window (inclusive)
    #[serde(default = "default_peak_start")]
    pub peak_start_hour: u32,
    /// Last hour of the peak window (inclusive)
    #[serde(default = "default_peak_end")]
    pub peak_end_hour: u32,
    /// First weekday index (0 = Monday) counted as weekend
    #[serde(default = "default_weekend_start")]
    pub weekend_start_day: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            peak_start_hour: default_peak_start(),
            peak_end_hour: default_peak_end(),
            weekend_start_day: default_weekend_start(),
        }
    }
}

fn default_peak_start() -> u32 {
    18
}

fn default_peak_end() -> u32 {
    22
}

fn default_weekend_start() -> u32 {
    5
}

impl CalendarConfig {
    /// Build a validated configuration.
    pub fn new(
        peak_start_hour: u32,
        peak_end_hour: u32,
        weekend_start_day: u32,
    ) -> AnalysisResult<Self> {
        let config = Self {
            peak_start_hour,
            peak_end_hour,
            weekend_start_day,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if self.peak_end_hour > 23 {
            return Err(AnalysisError::Config(format!(
                "peak end hour {} is outside 0-23",
                self.peak_end_hour
            )));
        }
        if self.peak_start_hour > self.peak_end_hour {
            return Err(AnalysisError::Config(format!(
                "peak window {}-{} is empty",
                self.peak_start_hour, self.peak_end_hour
            )));
        }
        // 7 means "no weekend days"
        if self.weekend_start_day > 7 {
            return Err(AnalysisError::Config(format!(
                "weekend start day {} is outside 0-7",
                self.weekend_start_day
            )));
        }
        Ok(())
    }

    pub fn is_peak_hour(&self, hour: u32) -> bool {
        (self.peak_start_hour..=self.peak_end_hour).contains(&hour)
    }

    pub fn is_weekday(&self, weekday: u32) -> bool {
        weekday < self.weekend_start_day
    }
}
