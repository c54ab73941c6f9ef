//! Rule-based natural language observations.
//!
//! Rules run in a fixed order and each appends at most one line, so the
//! output order is stable and matches the exported report.

use crate::models::{GlucoseCategory, ReadingSet, Statistics, TrendDirection};
use crate::thresholds::{FASTING, POSTPRANDIAL};

/// Normal share below which control is reported as poor (percent)
pub const LOW_CONTROL_PERCENTAGE: f64 = 50.0;

/// Normal share above which control is reported as good (percent)
pub const GOOD_CONTROL_PERCENTAGE: f64 = 75.0;

pub const FALLBACK_INSIGHT: &str = "Your blood sugar readings appear to be relatively stable. Continue monitoring and maintain your current management plan.";

pub struct InsightGenerator;

impl InsightGenerator {
    /// Generate the ordered insight list for a processed reading set
    pub fn generate(set: &ReadingSet, stats: &Statistics) -> Vec<String> {
        let mut insights = Vec::new();

        if !set.morning().is_empty() {
            match stats.morning_trend {
                TrendDirection::Increasing => insights.push(
                    "Your morning (fasting) blood sugar is trending upward. Consider evaluating your evening meals and bedtime snacks."
                        .to_string(),
                ),
                TrendDirection::Decreasing => insights.push(
                    "Your morning blood sugar is trending downward, which is positive if previous levels were elevated."
                        .to_string(),
                ),
                TrendDirection::Stable => {}
            }

            if stats.morning_average > FASTING.normal_max {
                insights.push(format!(
                    "Your average morning blood sugar ({} mg/dL) is above the normal fasting range. This may indicate the dawn phenomenon or evening dietary factors.",
                    round_display(stats.morning_average)
                ));
            }
        }

        if !set.evening().is_empty() {
            if stats.evening_trend == TrendDirection::Increasing {
                insights.push(
                    "Your evening blood sugar readings are trending upward. Consider reviewing your meal portions and carbohydrate intake."
                        .to_string(),
                );
            }

            if stats.evening_average > POSTPRANDIAL.normal_max {
                insights.push(format!(
                    "Your average evening blood sugar ({} mg/dL) is above the normal post-meal range. Consider spacing your meals or adjusting your diet.",
                    round_display(stats.evening_average)
                ));
            }
        }

        let hypoglycemic = set.count_category(GlucoseCategory::Hypoglycemic);
        if hypoglycemic > 0 {
            insights.push(format!(
                "You have {} blood sugar reading(s) below 70 mg/dL, which indicates hypoglycemia. Please discuss these episodes with your healthcare provider.",
                hypoglycemic
            ));
        }

        if stats.normal_percentage < LOW_CONTROL_PERCENTAGE {
            insights.push(format!(
                "Only {}% of your readings are in the normal range. Work with your healthcare provider to improve blood sugar control.",
                round_display(stats.normal_percentage)
            ));
        } else if stats.normal_percentage > GOOD_CONTROL_PERCENTAGE {
            insights.push(format!(
                "{}% of your readings are in the normal range, which shows good blood sugar control.",
                round_display(stats.normal_percentage)
            ));
        }

        if insights.is_empty() {
            insights.push(FALLBACK_INSIGHT.to_string());
        }

        insights
    }
}

/// Nearest whole number, halves rounded away from zero
fn round_display(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;
    use crate::stats::StatisticsCalculator;
    use chrono::{TimeZone, Utc};

    fn set_of(samples: &[(u32, u32, f64)]) -> ReadingSet {
        ReadingSet::new(
            samples
                .iter()
                .map(|&(day, hour, value)| {
                    Reading::new(Utc.with_ymd_and_hms(2023, 4, day, hour, 0, 0).unwrap(), value)
                        .unwrap()
                })
                .collect(),
        )
    }

    fn generate(samples: &[(u32, u32, f64)]) -> Vec<String> {
        let set = set_of(samples);
        let stats = StatisticsCalculator::calculate(&set);
        InsightGenerator::generate(&set, &stats)
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(round_display(99.5), 100);
        assert_eq!(round_display(99.49), 99);
        assert_eq!(round_display(66.6667), 67);
    }

    #[test]
    fn test_hypoglycemic_count() {
        let insights = generate(&[(1, 8, 65.0), (1, 18, 120.0), (2, 8, 90.0)]);
        assert!(insights
            .iter()
            .any(|i| i.contains("You have 1 blood sugar reading(s) below 70 mg/dL")));
    }

    #[test]
    fn test_fallback_when_nothing_fires() {
        // 2 normal of 3 = 66.7%, no trends, averages in range
        let insights = generate(&[(1, 8, 95.0), (1, 18, 150.0), (2, 18, 120.0)]);
        assert_eq!(insights, vec![FALLBACK_INSIGHT.to_string()]);
    }

    #[test]
    fn test_good_control() {
        let insights = generate(&[(1, 8, 90.0), (1, 18, 120.0), (2, 8, 92.0), (2, 18, 130.0)]);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].starts_with("100% of your readings are in the normal range"));
    }

    #[test]
    fn test_rule_order() {
        // Rising fasting values above range, rising evening values above range
        let insights = generate(&[
            (1, 8, 110.0),
            (2, 8, 120.0),
            (3, 8, 130.0),
            (1, 18, 150.0),
            (2, 18, 170.0),
            (3, 18, 190.0),
        ]);

        assert_eq!(insights.len(), 5);
        assert!(insights[0].contains("morning (fasting) blood sugar is trending upward"));
        assert!(insights[1].contains("average morning blood sugar (120 mg/dL)"));
        assert!(insights[2].contains("evening blood sugar readings are trending upward"));
        assert!(insights[3].contains("average evening blood sugar (170 mg/dL)"));
        assert!(insights[4].starts_with("Only 0% of your readings"));
    }

    #[test]
    fn test_decreasing_morning_trend() {
        let insights = generate(&[(1, 8, 98.0), (2, 8, 90.0), (3, 8, 80.0)]);
        assert!(insights[0].contains("trending downward"));
        assert!(insights[1].starts_with("100%"));
    }

    #[test]
    fn test_evening_decrease_has_no_insight() {
        let insights = generate(&[(1, 18, 135.0), (2, 18, 120.0), (3, 18, 100.0)]);
        assert!(!insights.iter().any(|i| i.contains("trending")));
    }
}
