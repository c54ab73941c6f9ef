//! Linear trend detection over a sequence of readings.
//!
//! The slope is an ordinary least-squares fit of value against reading
//! index, so irregular spacing in time does not affect it.

use statrs::statistics::Statistics;

use crate::models::{Reading, TrendDirection};

/// Fewer readings than this are always reported as stable
pub const MIN_TREND_READINGS: usize = 3;

/// Minimum absolute slope (mg/dL per reading) that counts as a trend
pub const SLOPE_THRESHOLD: f64 = 0.5;

pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Classify the drift of `readings`, which must already be restricted to
    /// one time-of-day group and ordered by timestamp.
    pub fn analyze(readings: &[Reading]) -> TrendDirection {
        let values: Vec<f64> = readings.iter().map(|r| r.value()).collect();
        Self::analyze_values(&values)
    }

    /// Same as [`TrendAnalyzer::analyze`] over raw values
    pub fn analyze_values(values: &[f64]) -> TrendDirection {
        if values.len() < MIN_TREND_READINGS {
            return TrendDirection::Stable;
        }

        let slope = Self::slope(values);
        if slope.abs() < SLOPE_THRESHOLD {
            TrendDirection::Stable
        } else if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }

    /// Least-squares slope of `values` against `0..n`; 0 when undefined
    pub fn slope(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }

        let indices: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
        let variance = indices.iter().variance();
        if variance == 0.0 || !variance.is_finite() {
            return 0.0;
        }

        indices.iter().covariance(values.iter()) / variance
    }
}
