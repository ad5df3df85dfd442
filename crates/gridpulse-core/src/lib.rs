//! # gridpulse-core: Zone Load Analytics Core
//!
//! Turns timestamped three-zone power readings into load patterns, anomaly
//! flags, hour-of-day risk classes and demand balancing advice.
//!
//! ## Pipeline
//!
//! 1. [`preprocess`] parses and sorts raw rows into a [`TimeSeriesFrame`]
//!    with hour, weekday, day type, total load and peak type per row.
//! 2. [`detect_wastage`] computes the global [`WastageBaseline`] once and
//!    flags rows above `mean + 2·std`.
//! 3. On demand: segment means ([`peak_offpeak_means`], [`day_type_means`]),
//!    [`rolling_trend`], [`identify_high_risk_hours`], [`score_zones`],
//!    [`detect_statistical_anomalies`] and [`advise`].
//!
//! [`AnalysisSession`] wires these together and enforces call order:
//! statistical anomalies reuse the startup baseline, and demand balancing
//! requires a prior risk identification.
//!
//! ## Quick Start
//!
//! ```
//! use gridpulse_core::{AnalysisSession, CalendarConfig, RawRow};
//!
//! let rows: Vec<RawRow> = (0..24)
//!     .map(|h| RawRow::new(format!("2017-01-02 {h:02}:00:00"), [10.0 + h as f64, 5.0, 5.0]))
//!     .collect();
//! let (mut session, wastage) = AnalysisSession::start(&rows, CalendarConfig::default()).unwrap();
//! assert_eq!(wastage.flagged, 0);
//!
//! let risk = session.identify_risk().unwrap();
//! let advice = session.demand_balancing().unwrap();
//! assert_eq!(advice.high_risk_hours, risk.high_risk.len());
//! ```

pub mod anomaly;
pub mod balancing;
pub mod config;
pub mod error;
pub mod frame;
pub mod preprocess;
pub mod risk;
pub mod segment;
pub mod session;
pub mod stats;
pub mod trend;
pub mod wastage;
pub mod zones;

pub use anomaly::{detect_statistical_anomalies, AnomalousReading, StatAnomalyReport, Z_THRESHOLD};
pub use balancing::{advise, BalancingAdvice, Recommendation, SHIFT_RATIO, STAGGER_HOUR_LIMIT};
pub use config::CalendarConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use frame::{DayType, DerivedRow, PeakType, Reading, TimeSeriesFrame, Zone, ZONE_COUNT};
pub use preprocess::{export_raw_rows, parse_timestamp, preprocess, RawRow};
pub use risk::{identify_high_risk_hours, HighRiskHour, HighRiskHours, RiskAssessment};
pub use segment::{
    day_type_means, hourly_profile, peak_offpeak_means, segment_means, sorted_segment_means,
    HourlyProfile, SegmentMean, SegmentMeans,
};
pub use session::AnalysisSession;
pub use trend::{rolling_trend, trailing_mean, RollingTrend, LONG_WINDOW, SHORT_WINDOW};
pub use wastage::{detect_wastage, WastageBaseline, WastageReport, WASTAGE_SIGMA};
pub use zones::{score_zones, ZoneScore};
