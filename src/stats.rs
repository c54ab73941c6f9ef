use statrs::statistics::Statistics as _;
use tracing::debug;

use crate::models::{GlucoseCategory, Reading, ReadingSet, Statistics};
use crate::trend::TrendAnalyzer;

/// Aggregates a [`ReadingSet`] into summary [`Statistics`]
pub struct StatisticsCalculator;

impl StatisticsCalculator {
    /// Compute averages, extrema, trends and category shares.
    ///
    /// Group averages are 0 for an empty group. Extrema and percentages are
    /// taken over the full set; an empty set yields all zeros.
    pub fn calculate(set: &ReadingSet) -> Statistics {
        let (min, max) = Self::extrema(set.all());

        let stats = Statistics {
            average: Self::average(set.all()),
            morning_average: Self::average(set.morning()),
            evening_average: Self::average(set.evening()),
            max,
            min,
            morning_trend: TrendAnalyzer::analyze(set.morning()),
            evening_trend: TrendAnalyzer::analyze(set.evening()),
            normal_percentage: Self::category_percentage(set, GlucoseCategory::Normal),
            prediabetic_percentage: Self::category_percentage(set, GlucoseCategory::Prediabetic),
            diabetic_percentage: Self::category_percentage(set, GlucoseCategory::Diabetic),
            hypoglycemic_percentage: Self::category_percentage(set, GlucoseCategory::Hypoglycemic),
        };

        debug!(
            readings = set.len(),
            average = stats.average,
            morning_trend = %stats.morning_trend,
            evening_trend = %stats.evening_trend,
            "Statistics calculated"
        );

        stats
    }

    /// Mean value, 0 for no readings
    pub fn average(readings: &[Reading]) -> f64 {
        if readings.is_empty() {
            return 0.0;
        }
        readings.iter().map(|r| r.value()).mean()
    }

    /// (min, max) over `readings`, (0, 0) for no readings
    pub fn extrema(readings: &[Reading]) -> (f64, f64) {
        if readings.is_empty() {
            return (0.0, 0.0);
        }

        readings
            .iter()
            .map(|r| r.value())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Share of readings in `category` as a percentage of the whole set
    pub fn category_percentage(set: &ReadingSet, category: GlucoseCategory) -> f64 {
        if set.is_empty() {
            return 0.0;
        }
        set.count_category(category) as f64 / set.len() as f64 * 100.0
    }
}
