//! Raw rows → sorted [`TimeSeriesFrame`] with calendar and load features.

use crate::config::CalendarConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::frame::{DayType, DerivedRow, PeakType, Reading, TimeSeriesFrame, ZONE_COUNT};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::{debug, warn};

/// Layout used when readings are exported back to raw rows.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// One unparsed row as handed over by the ingestion source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub timestamp: String,
    pub zones: [Option<f64>; ZONE_COUNT],
}

impl RawRow {
    pub fn new(timestamp: impl Into<String>, zones: [f64; ZONE_COUNT]) -> Self {
        Self {
            timestamp: timestamp.into(),
            zones: zones.map(Some),
        }
    }
}

/// Parse, sort and featurize raw rows.
///
/// Any malformed row aborts the whole load; no partial frame is returned.
/// Rows sharing a timestamp keep their input order.
pub fn preprocess(rows: &[RawRow], config: &CalendarConfig) -> AnalysisResult<TimeSeriesFrame> {
    config.validate()?;

    let mut readings = rows
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_row(index, raw))
        .collect::<AnalysisResult<Vec<Reading>>>()?;

    // Vec::sort_by_key is stable
    readings.sort_by_key(|reading| reading.timestamp);

    let duplicates = readings
        .windows(2)
        .filter(|pair| pair[0].timestamp == pair[1].timestamp)
        .count();
    if duplicates > 0 {
        warn!(duplicates, "readings share a timestamp with their predecessor");
    }

    let derived: Vec<DerivedRow> = readings
        .into_iter()
        .map(|reading| derive_row(reading, config))
        .collect();
    debug!(rows = derived.len(), "preprocessed readings");

    Ok(TimeSeriesFrame::from_sorted_rows(derived))
}

/// Export the frame's readings as raw rows for re-ingestion.
pub fn export_raw_rows(frame: &TimeSeriesFrame) -> Vec<RawRow> {
    frame
        .rows()
        .iter()
        .map(|row| RawRow {
            timestamp: row
                .reading
                .timestamp
                .format(EXPORT_TIMESTAMP_FORMAT)
                .to_string(),
            zones: row.reading.zones.map(Some),
        })
        .collect()
}

pub fn derive_row(reading: Reading, config: &CalendarConfig) -> DerivedRow {
    let hour = reading.timestamp.hour();
    let weekday = reading.timestamp.weekday().num_days_from_monday();
    let day_type = if config.is_weekday(weekday) {
        DayType::Weekday
    } else {
        DayType::Weekend
    };
    let peak_type = if config.is_peak_hour(hour) {
        PeakType::Peak
    } else {
        PeakType::OffPeak
    };
    DerivedRow {
        reading,
        hour,
        weekday,
        day_type,
        total_load: reading.total_load(),
        peak_type,
    }
}

/// Parse a timestamp in any of the accepted layouts.
///
/// Offsets in RFC 3339 input are normalized to UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn parse_row(index: usize, raw: &RawRow) -> AnalysisResult<Reading> {
    let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| AnalysisError::MalformedRow {
        row: index,
        reason: format!("unparseable timestamp '{}'", raw.timestamp),
    })?;

    let mut zones = [0.0; ZONE_COUNT];
    for (slot, (zone, value)) in zones.iter_mut().zip(raw.zones.iter().copied().enumerate()) {
        let value = value.ok_or_else(|| AnalysisError::MalformedRow {
            row: index,
            reason: format!("missing value for zone {}", zone + 1),
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(AnalysisError::MalformedRow {
                row: index,
                reason: format!("zone {} load {} is not a non-negative number", zone + 1, value),
            });
        }
        *slot = value;
    }

    Ok(Reading { timestamp, zones })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_at(hours: &[u32]) -> Vec<RawRow> {
        hours
            .iter()
            .map(|h| RawRow::new(format!("2017-01-02 {h:02}:00:00"), [1.0, 2.0, 3.0]))
            .collect()
    }

    #[test]
    fn sorts_by_timestamp_and_derives_features() {
        let rows = vec![
            RawRow::new("2017-01-07 19:00:00", [10.0, 20.0, 30.0]),
            RawRow::new("2017-01-02 08:30:00", [1.0, 2.0, 3.0]),
        ];
        let frame = preprocess(&rows, &CalendarConfig::default()).unwrap();
        let first = frame.rows()[0];
        let second = frame.rows()[1];

        // 2017-01-02 was a Monday
        assert_eq!(first.hour, 8);
        assert_eq!(first.weekday, 0);
        assert_eq!(first.day_type, DayType::Weekday);
        assert_eq!(first.peak_type, PeakType::OffPeak);
        assert_eq!(first.total_load, 6.0);

        assert_eq!(second.weekday, 5);
        assert_eq!(second.day_type, DayType::Weekend);
        assert_eq!(second.peak_type, PeakType::Peak);
        assert_eq!(second.total_load, 60.0);
    }

    #[test]
    fn peak_boundaries_are_inclusive() {
        let frame = preprocess(&rows_at(&[17, 18, 22, 23]), &CalendarConfig::default()).unwrap();
        let labels: Vec<PeakType> = frame.rows().iter().map(|r| r.peak_type).collect();
        assert_eq!(
            labels,
            vec![
                PeakType::OffPeak,
                PeakType::Peak,
                PeakType::Peak,
                PeakType::OffPeak
            ]
        );
    }

    #[test]
    fn custom_peak_window_is_honored() {
        let config = CalendarConfig::new(17, 17, 5).unwrap();
        let frame = preprocess(&rows_at(&[17, 18]), &config).unwrap();
        assert_eq!(frame.rows()[0].peak_type, PeakType::Peak);
        assert_eq!(frame.rows()[1].peak_type, PeakType::OffPeak);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![
            RawRow::new("2017-01-02 01:00:00", [1.0, 0.0, 0.0]),
            RawRow::new("2017-01-02 00:00:00", [2.0, 0.0, 0.0]),
            RawRow::new("2017-01-02 01:00:00", [3.0, 0.0, 0.0]),
        ];
        let frame = preprocess(&rows, &CalendarConfig::default()).unwrap();
        let loads = frame.total_loads();
        assert_eq!(loads, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn accepts_source_and_iso_layouts() {
        let expected = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 10, 0)
            .unwrap();
        assert_eq!(parse_timestamp("1/1/2017 0:10"), Some(expected));
        assert_eq!(parse_timestamp("2017-01-01T00:10:00"), Some(expected));
        assert_eq!(parse_timestamp("2017-01-01 00:10"), Some(expected));
        assert_eq!(parse_timestamp("2017-01-01T01:10:00+01:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2017-01-01"),
            Some(expected.date().and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("not a date"), None);
    }

    #[test]
    fn malformed_rows_abort_with_index() {
        let mut rows = rows_at(&[0, 1, 2]);
        rows[1].timestamp = "13/45/2017 99:00".to_string();
        let err = preprocess(&rows, &CalendarConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRow { row: 1, .. }));

        let mut rows = rows_at(&[0, 1, 2]);
        rows[2].zones[1] = None;
        let err = preprocess(&rows, &CalendarConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRow { row: 2, .. }));

        let mut rows = rows_at(&[0]);
        rows[0].zones[0] = Some(-1.0);
        assert!(preprocess(&rows, &CalendarConfig::default()).is_err());
    }

    #[test]
    fn export_round_trip_is_bit_identical() {
        let rows = vec![
            RawRow::new("1/3/2017 22:40", [34_055.696, 16_128.875, 20_240.964]),
            RawRow::new("1/1/2017 0:00", [34_055.696_2, 16_128.875_53, 20_240.963_86]),
            RawRow::new("2017-01-01T12:00:00.250", [0.1, 0.2, 0.3]),
        ];
        let config = CalendarConfig::default();
        let first = preprocess(&rows, &config).unwrap();
        let second = preprocess(&export_raw_rows(&first), &config).unwrap();
        assert_eq!(first.rows(), second.rows());
        for (a, b) in first.total_loads().iter().zip(second.total_loads()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn empty_input_yields_empty_frame() {
        let frame = preprocess(&[], &CalendarConfig::default()).unwrap();
        assert!(frame.is_empty());
    }
}
