use std::collections::BTreeSet;

use crate::models::{ChartSeries, Reading, ReadingSet};

/// Project readings onto one morning and one evening value per calendar day.
///
/// Days without a reading in a period get `None`. When a day has several
/// readings in the same period only the earliest is used.
pub fn to_chart_series(readings: &ReadingSet) -> ChartSeries {
    let dates: Vec<String> = readings
        .all()
        .iter()
        .map(Reading::day_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let morning_values = dates
        .iter()
        .map(|day| first_value_on(readings.morning(), day))
        .collect();
    let evening_values = dates
        .iter()
        .map(|day| first_value_on(readings.evening(), day))
        .collect();

    ChartSeries {
        dates,
        morning_values,
        evening_values,
    }
}

fn first_value_on(readings: &[Reading], day: &str) -> Option<f64> {
    readings
        .iter()
        .find(|r| r.day_key() == day)
        .map(Reading::value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(day: u32, hour: u32, value: f64) -> Reading {
        Reading::new(Utc.with_ymd_and_hms(2023, 4, day, hour, 0, 0).unwrap(), value).unwrap()
    }

    #[test]
    fn test_missing_periods() {
        let set = ReadingSet::new(vec![
            reading(3, 8, 125.0),
            reading(1, 8, 120.0),
            reading(1, 18, 145.0),
            reading(2, 19, 135.0),
        ]);
        let series = to_chart_series(&set);

        assert_eq!(series.dates, vec!["2023-04-01", "2023-04-02", "2023-04-03"]);
        assert_eq!(series.morning_values, vec![Some(120.0), None, Some(125.0)]);
        assert_eq!(series.evening_values, vec![Some(145.0), Some(135.0), None]);
    }

    #[test]
    fn test_duplicate_period_uses_first() {
        let set = ReadingSet::new(vec![
            reading(1, 9, 130.0),
            reading(1, 7, 110.0),
            reading(1, 20, 150.0),
            reading(1, 13, 160.0),
        ]);
        let series = to_chart_series(&set);

        assert_eq!(series.dates.len(), 1);
        assert_eq!(series.morning_values, vec![Some(110.0)]);
        assert_eq!(series.evening_values, vec![Some(160.0)]);
    }

    #[test]
    fn test_empty() {
        let series = to_chart_series(&ReadingSet::new(Vec::new()));
        assert!(series.dates.is_empty());
        assert!(series.morning_values.is_empty());
    }
}
