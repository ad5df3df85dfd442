//! Session context carrying the frame and cached prerequisites.
//!
//! The wastage baseline is computed once when the session starts; the
//! high-risk hour set is cached the first time risk identification succeeds.
//! Operations that need a missing prerequisite fail with
//! `PrecomputationRequired` instead of substituting a default.

use crate::anomaly::{detect_statistical_anomalies, StatAnomalyReport};
use crate::balancing::{advise, BalancingAdvice};
use crate::config::CalendarConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::frame::{DayType, PeakType, TimeSeriesFrame};
use crate::preprocess::{derive_row, preprocess, RawRow};
use crate::risk::{identify_high_risk_hours, HighRiskHours, RiskAssessment};
use crate::segment::{day_type_means, peak_offpeak_means, SegmentMeans};
use crate::trend::{rolling_trend, RollingTrend};
use crate::wastage::{detect_wastage, WastageBaseline, WastageReport};
use crate::zones::{score_zones, ZoneScore};
use tracing::info;

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    frame: TimeSeriesFrame,
    config: CalendarConfig,
    baseline: WastageBaseline,
    high_risk: Option<HighRiskHours>,
}

impl AnalysisSession {
    /// Preprocess `rows` and start a session over the result.
    pub fn start(rows: &[RawRow], config: CalendarConfig) -> AnalysisResult<(Self, WastageReport)> {
        let frame = preprocess(rows, &config)?;
        Self::from_frame(frame, config)
    }

    /// Start a session over an already preprocessed frame.
    ///
    /// Runs wastage detection once; its baseline is reused by every later
    /// statistical anomaly request. Fails with `Config` when the frame's
    /// calendar features were derived under a different configuration.
    pub fn from_frame(
        mut frame: TimeSeriesFrame,
        config: CalendarConfig,
    ) -> AnalysisResult<(Self, WastageReport)> {
        config.validate()?;
        if let Some(index) = frame
            .rows()
            .iter()
            .position(|row| derive_row(row.reading, &config) != *row)
        {
            return Err(AnalysisError::Config(format!(
                "row {index} was derived with a different calendar configuration"
            )));
        }
        let report = detect_wastage(&mut frame)?;
        info!(rows = frame.len(), "analysis session started");
        let session = Self {
            frame,
            config,
            baseline: report.baseline,
            high_risk: None,
        };
        Ok((session, report))
    }

    pub fn frame(&self) -> &TimeSeriesFrame {
        &self.frame
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn baseline(&self) -> &WastageBaseline {
        &self.baseline
    }

    pub fn high_risk(&self) -> Option<&HighRiskHours> {
        self.high_risk.as_ref()
    }

    pub fn peak_offpeak(&self) -> SegmentMeans<PeakType> {
        peak_offpeak_means(&self.frame)
    }

    pub fn rolling_trend(&self) -> RollingTrend {
        rolling_trend(&self.frame)
    }

    pub fn weekday_weekend(&self) -> SegmentMeans<DayType> {
        day_type_means(&self.frame)
    }

    /// Identify high-risk hours and cache them for demand balancing.
    pub fn identify_risk(&mut self) -> AnalysisResult<RiskAssessment> {
        let assessment = identify_high_risk_hours(&self.frame)?;
        self.high_risk = Some(assessment.high_risk.clone());
        Ok(assessment)
    }

    pub fn zone_efficiency(&self) -> AnalysisResult<Vec<ZoneScore>> {
        score_zones(&self.frame)
    }

    pub fn statistical_anomalies(&mut self) -> AnalysisResult<StatAnomalyReport> {
        detect_statistical_anomalies(&mut self.frame, &self.baseline)
    }

    /// Requires [`identify_risk`](Self::identify_risk) to have succeeded earlier in this session.
    pub fn demand_balancing(&self) -> AnalysisResult<BalancingAdvice> {
        let high_risk = self
            .high_risk
            .as_ref()
            .ok_or(AnalysisError::PrecomputationRequired {
                operation: "demand balancing",
                prerequisite: "peak load risk identification",
            })?;
        advise(&self.frame, high_risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(loads: impl Fn(u32) -> f64) -> Vec<RawRow> {
        (0..24)
            .map(|h| RawRow::new(format!("2017-01-02 {h:02}:00:00"), [loads(h), 1.0, 1.0]))
            .collect()
    }

    #[test]
    fn balancing_before_risk_is_a_precondition_failure() {
        let (session, _) = AnalysisSession::start(&day(|h| h as f64), CalendarConfig::default()).unwrap();
        let err = session.demand_balancing().unwrap_err();
        assert!(matches!(err, AnalysisError::PrecomputationRequired { .. }));
    }

    #[test]
    fn risk_result_is_cached_for_balancing() {
        let (mut session, _) = AnalysisSession::start(
            &day(|h| if (18..=22).contains(&h) { 120.0 } else { 100.0 }),
            CalendarConfig::default(),
        )
        .unwrap();
        let assessment = session.identify_risk().unwrap();
        assert_eq!(session.high_risk(), Some(&assessment.high_risk));
        assert!(session.demand_balancing().is_ok());
    }

    #[test]
    fn frame_must_match_session_calendar() {
        let evening = CalendarConfig::new(20, 23, 5).unwrap();
        let frame = preprocess(&day(|h| h as f64), &evening).unwrap();

        let err = AnalysisSession::from_frame(frame.clone(), CalendarConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));

        let (session, _) = AnalysisSession::from_frame(frame, evening).unwrap();
        assert_eq!(session.config(), &evening);
    }

    #[test]
    fn startup_requires_two_rows() {
        let rows = vec![RawRow::new("2017-01-02 00:00:00", [1.0, 1.0, 1.0])];
        let err = AnalysisSession::start(&rows, CalendarConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn failed_operation_leaves_session_usable() {
        let (mut session, _) = AnalysisSession::start(&day(|_| 0.0), CalendarConfig::default()).unwrap();
        // zones 2 and 3 carry constant load, so total load has zero variance
        assert!(matches!(
            session.statistical_anomalies(),
            Err(AnalysisError::DivisionByZero(_))
        ));
        assert_eq!(session.weekday_weekend().len(), 1);
        assert_eq!(session.frame().len(), 24);
    }
}
