use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify;

/// Measurement context derived from the hour of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Before noon, treated as a fasting measurement
    Morning,
    /// Noon onwards, treated as a postprandial measurement
    Evening,
}

impl TimeOfDay {
    /// Morning iff the hour of `timestamp` is before 12
    pub fn from_timestamp(timestamp: &DateTime<Utc>) -> Self {
        if timestamp.hour() < 12 {
            TimeOfDay::Morning
        } else {
            TimeOfDay::Evening
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOfDay::Morning => write!(f, "morning"),
            TimeOfDay::Evening => write!(f, "evening"),
        }
    }
}

/// Medical category of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseCategory {
    Normal,
    Prediabetic,
    Diabetic,
    Hypoglycemic,
}

impl GlucoseCategory {
    pub const ALL: [GlucoseCategory; 4] = [
        GlucoseCategory::Normal,
        GlucoseCategory::Prediabetic,
        GlucoseCategory::Diabetic,
        GlucoseCategory::Hypoglycemic,
    ];
}

impl fmt::Display for GlucoseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GlucoseCategory::Normal => "normal",
            GlucoseCategory::Prediabetic => "prediabetic",
            GlucoseCategory::Diabetic => "diabetic",
            GlucoseCategory::Hypoglycemic => "hypoglycemic",
        };
        f.pad(name)
    }
}

/// Direction of drift across a sequence of readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Stable,
    Increasing,
    Decreasing,
}

impl TrendDirection {
    /// Short display label with an arrow
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "Upward ↑",
            TrendDirection::Decreasing => "Downward ↓",
            TrendDirection::Stable => "Stable →",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// A single blood glucose measurement.
///
/// Time of day and category are derived on construction and cannot be
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    timestamp: DateTime<Utc>,
    value: f64,
    time_of_day: TimeOfDay,
    category: GlucoseCategory,
}

impl Reading {
    /// Build a reading, classifying it against the threshold table.
    ///
    /// Returns `None` unless `value` is finite and non-negative.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }

        let (time_of_day, category) = classify::classify(&timestamp, value);
        Some(Reading {
            timestamp,
            value,
            time_of_day,
            category,
        })
    }

    /// When the reading was taken (UTC)
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Glucose value in mg/dL
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    pub fn category(&self) -> GlucoseCategory {
        self.category
    }

    /// Calendar day of the reading as `YYYY-MM-DD`
    pub fn day_key(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// All readings of one upload, ordered by timestamp, plus the morning and
/// evening subsequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSet {
    readings: Vec<Reading>,
    morning_readings: Vec<Reading>,
    evening_readings: Vec<Reading>,
}

impl ReadingSet {
    /// Sort `readings` by timestamp (stable) and split them by time of day
    pub fn new(mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|r| r.timestamp);

        let (morning_readings, evening_readings): (Vec<Reading>, Vec<Reading>) = readings
            .iter()
            .copied()
            .partition(|r| r.time_of_day == TimeOfDay::Morning);

        ReadingSet {
            readings,
            morning_readings,
            evening_readings,
        }
    }

    /// Every reading in timestamp order
    pub fn all(&self) -> &[Reading] {
        &self.readings
    }

    pub fn morning(&self) -> &[Reading] {
        &self.morning_readings
    }

    pub fn evening(&self) -> &[Reading] {
        &self.evening_readings
    }

    /// Readings taken at the given time of day
    pub fn by_time_of_day(&self, time_of_day: TimeOfDay) -> &[Reading] {
        match time_of_day {
            TimeOfDay::Morning => self.morning(),
            TimeOfDay::Evening => self.evening(),
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Number of readings in `category`
    pub fn count_category(&self, category: GlucoseCategory) -> usize {
        self.readings
            .iter()
            .filter(|r| r.category == category)
            .count()
    }
}

/// Summary statistics computed from a [`ReadingSet`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mean over all readings
    pub average: f64,

    /// Mean over morning readings (0 when there are none)
    pub morning_average: f64,

    /// Mean over evening readings (0 when there are none)
    pub evening_average: f64,

    /// Highest value over all readings
    pub max: f64,

    /// Lowest value over all readings
    pub min: f64,

    pub morning_trend: TrendDirection,
    pub evening_trend: TrendDirection,

    /// Category shares of all readings, in percent
    pub normal_percentage: f64,
    pub prediabetic_percentage: f64,
    pub diabetic_percentage: f64,
    pub hypoglycemic_percentage: f64,
}

impl Statistics {
    /// Percentage of readings in `category`
    pub fn percentage(&self, category: GlucoseCategory) -> f64 {
        match category {
            GlucoseCategory::Normal => self.normal_percentage,
            GlucoseCategory::Prediabetic => self.prediabetic_percentage,
            GlucoseCategory::Diabetic => self.diabetic_percentage,
            GlucoseCategory::Hypoglycemic => self.hypoglycemic_percentage,
        }
    }
}

/// Everything produced by one run of the processing pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedData {
    pub readings: ReadingSet,
    pub stats: Statistics,
    /// Observations in display order
    pub insights: Vec<String>,
}

/// Day-indexed morning/evening series for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Unique calendar days, ascending
    pub dates: Vec<String>,

    /// Morning value per day, `None` where the day has no morning reading
    pub morning_values: Vec<Option<f64>>,

    /// Evening value per day, `None` where the day has no evening reading
    pub evening_values: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_time_of_day_boundary() {
        assert_eq!(TimeOfDay::from_timestamp(&at(1, 0, 0)), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_timestamp(&at(1, 11, 59)), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_timestamp(&at(1, 12, 0)), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_timestamp(&at(1, 23, 59)), TimeOfDay::Evening);
    }

    #[test]
    fn test_reading_rejects_invalid_values() {
        assert!(Reading::new(at(1, 8, 0), f64::NAN).is_none());
        assert!(Reading::new(at(1, 8, 0), f64::INFINITY).is_none());
        assert!(Reading::new(at(1, 8, 0), -1.0).is_none());
        assert!(Reading::new(at(1, 8, 0), 0.0).is_some());
    }

    #[test]
    fn test_reading_derives_classification() {
        let reading = Reading::new(at(1, 8, 30), 120.0).unwrap();
        assert_eq!(reading.time_of_day(), TimeOfDay::Morning);
        assert_eq!(reading.category(), GlucoseCategory::Prediabetic);
        assert_eq!(reading.day_key(), "2023-04-01");
    }

    #[test]
    fn test_reading_set_sorts_and_partitions() {
        let readings = vec![
            Reading::new(at(2, 19, 0), 150.0).unwrap(),
            Reading::new(at(1, 8, 0), 100.0).unwrap(),
            Reading::new(at(1, 18, 0), 140.0).unwrap(),
            Reading::new(at(2, 7, 0), 95.0).unwrap(),
        ];
        let set = ReadingSet::new(readings);

        let values: Vec<f64> = set.all().iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![100.0, 140.0, 95.0, 150.0]);
        assert_eq!(set.morning().len(), 2);
        assert_eq!(set.evening().len(), 2);
        assert_eq!(set.morning().len() + set.evening().len(), set.len());
        assert!(set.morning().iter().all(|r| r.time_of_day() == TimeOfDay::Morning));
        assert_eq!(set.by_time_of_day(TimeOfDay::Evening)[0].value(), 140.0);
    }

    #[test]
    fn test_reading_set_sort_is_stable() {
        let readings = vec![
            Reading::new(at(1, 8, 0), 110.0).unwrap(),
            Reading::new(at(1, 8, 0), 90.0).unwrap(),
        ];
        let set = ReadingSet::new(readings);
        assert_eq!(set.all()[0].value(), 110.0);
        assert_eq!(set.all()[1].value(), 90.0);
    }

    #[test]
    fn test_trend_labels() {
        assert_eq!(TrendDirection::Increasing.label(), "Upward ↑");
        assert_eq!(TrendDirection::Decreasing.label(), "Downward ↓");
        assert_eq!(TrendDirection::Stable.label(), "Stable →");
        assert_eq!(TrendDirection::Stable.to_string(), "stable");
    }
}
