//! Mean total load grouped by a categorical key.
//!
//! Keys with no matching rows never appear in the output, so callers never
//! see a zero or NaN mean for an unobserved segment.

use crate::frame::{DayType, DerivedRow, PeakType, TimeSeriesFrame};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean load of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentMean<K> {
    pub key: K,
    pub mean_load: f64,
    pub rows: usize,
}

/// Ordered segment means.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SegmentMeans<K> {
    segments: Vec<SegmentMean<K>>,
}

impl<K: PartialEq + Copy> SegmentMeans<K> {
    pub fn get(&self, key: K) -> Option<f64> {
        self.segments
            .iter()
            .find(|segment| segment.key == key)
            .map(|segment| segment.mean_load)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentMean<K>> {
        self.segments.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.segments.iter().map(|segment| segment.key)
    }

    pub fn means(&self) -> Vec<f64> {
        self.segments.iter().map(|segment| segment.mean_load).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Mean total load per hour of day, ascending by hour.
pub type HourlyProfile = SegmentMeans<u32>;

/// Group by `key` in first-seen order.
pub fn segment_means<K, F>(frame: &TimeSeriesFrame, key: F) -> SegmentMeans<K>
where
    K: PartialEq + Copy,
    F: Fn(&DerivedRow) -> K,
{
    // (key, sum, count); categorical keys have a handful of values
    let mut groups: Vec<(K, f64, usize)> = Vec::new();
    for row in frame.rows() {
        let k = key(row);
        match groups.iter_mut().find(|(existing, _, _)| *existing == k) {
            Some(group) => {
                group.1 += row.total_load;
                group.2 += 1;
            }
            None => groups.push((k, row.total_load, 1)),
        }
    }
    into_means(groups)
}

/// Group by `key` in ascending key order.
pub fn sorted_segment_means<K, F>(frame: &TimeSeriesFrame, key: F) -> SegmentMeans<K>
where
    K: Ord + Copy,
    F: Fn(&DerivedRow) -> K,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for row in frame.rows() {
        let entry = groups.entry(key(row)).or_insert((0.0, 0));
        entry.0 += row.total_load;
        entry.1 += 1;
    }
    into_means(
        groups
            .into_iter()
            .map(|(k, (sum, count))| (k, sum, count))
            .collect(),
    )
}

fn into_means<K>(groups: Vec<(K, f64, usize)>) -> SegmentMeans<K> {
    SegmentMeans {
        segments: groups
            .into_iter()
            .map(|(key, sum, rows)| SegmentMean {
                key,
                mean_load: sum / rows as f64,
                rows,
            })
            .collect(),
    }
}

/// Peak vs off-peak mean load.
pub fn peak_offpeak_means(frame: &TimeSeriesFrame) -> SegmentMeans<PeakType> {
    segment_means(frame, |row| row.peak_type)
}

/// Weekday vs weekend mean load.
pub fn day_type_means(frame: &TimeSeriesFrame) -> SegmentMeans<DayType> {
    segment_means(frame, |row| row.day_type)
}

pub fn hourly_profile(frame: &TimeSeriesFrame) -> HourlyProfile {
    sorted_segment_means(frame, |row| row.hour)
}
