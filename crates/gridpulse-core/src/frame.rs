//! In-memory table of zone readings and their derived columns.
//!
//! Rows are produced once by [`preprocess`](crate::preprocess) in ascending
//! timestamp order and are never reordered, removed or mutated afterwards.
//! Anomaly components may attach derived columns; each column is a
//! deterministic function of the rows and a baseline, so writing it a second
//! time stores identical values.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Number of distribution zones in a reading.
pub const ZONE_COUNT: usize = 3;

/// Distribution zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Zone {
    Zone1,
    Zone2,
    Zone3,
}

impl Zone {
    pub const ALL: [Zone; ZONE_COUNT] = [Zone::Zone1, Zone::Zone2, Zone::Zone3];

    pub fn index(self) -> usize {
        match self {
            Zone::Zone1 => 0,
            Zone::Zone2 => 1,
            Zone::Zone3 => 2,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Zone1 => write!(f, "Zone1"),
            Zone::Zone2 => write!(f, "Zone2"),
            Zone::Zone3 => write!(f, "Zone3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Weekend => write!(f, "Weekend"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PeakType {
    Peak,
    #[serde(rename = "Off-Peak")]
    OffPeak,
}

impl fmt::Display for PeakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakType::Peak => write!(f, "Peak"),
            PeakType::OffPeak => write!(f, "Off-Peak"),
        }
    }
}

/// One timestamped set of zone loads (kW).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub zones: [f64; ZONE_COUNT],
}

impl Reading {
    pub fn zone(&self, zone: Zone) -> f64 {
        self.zones[zone.index()]
    }

    pub fn total_load(&self) -> f64 {
        self.zones[0] + self.zones[1] + self.zones[2]
    }
}

/// A reading plus the calendar and load features derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRow {
    pub reading: Reading,
    pub hour: u32,
    /// 0 = Monday
    pub weekday: u32,
    pub day_type: DayType,
    pub total_load: f64,
    pub peak_type: PeakType,
}

/// Anomaly columns attached after preprocessing.
#[derive(Debug, Clone, Default, PartialEq)]
struct DerivedColumns {
    wastage_anomaly: Option<Vec<bool>>,
    z_score: Option<Vec<f64>>,
    stat_anomaly: Option<Vec<bool>>,
}

/// Sorted readings plus derived columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesFrame {
    rows: Vec<DerivedRow>,
    columns: DerivedColumns,
}

impl TimeSeriesFrame {
    /// Rows must already be in ascending timestamp order.
    pub(crate) fn from_sorted_rows(rows: Vec<DerivedRow>) -> Self {
        Self {
            rows,
            columns: DerivedColumns::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn total_loads(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.total_load).collect()
    }

    pub fn zone_loads(&self, zone: Zone) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row.reading.zone(zone))
    }

    pub fn wastage_anomaly(&self) -> Option<&[bool]> {
        self.columns.wastage_anomaly.as_deref()
    }

    pub fn z_score(&self) -> Option<&[f64]> {
        self.columns.z_score.as_deref()
    }

    pub fn stat_anomaly(&self) -> Option<&[bool]> {
        self.columns.stat_anomaly.as_deref()
    }

    pub(crate) fn set_wastage_anomaly(&mut self, flags: Vec<bool>) {
        debug_assert_eq!(flags.len(), self.rows.len());
        self.columns.wastage_anomaly = Some(flags);
    }

    pub(crate) fn set_statistical_columns(&mut self, z_scores: Vec<f64>, flags: Vec<bool>) {
        debug_assert_eq!(z_scores.len(), self.rows.len());
        debug_assert_eq!(flags.len(), self.rows.len());
        self.columns.z_score = Some(z_scores);
        self.columns.stat_anomaly = Some(flags);
    }
}
