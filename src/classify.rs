use chrono::{DateTime, Utc};

use crate::models::{GlucoseCategory, TimeOfDay};
use crate::thresholds::Thresholds;

/// Derive time of day and medical category for a reading
pub fn classify(timestamp: &DateTime<Utc>, value: f64) -> (TimeOfDay, GlucoseCategory) {
    let time_of_day = TimeOfDay::from_timestamp(timestamp);
    (time_of_day, categorize(value, time_of_day))
}

/// Categorize a value against the cutoffs for `time_of_day`.
///
/// Upper bounds are inclusive in both contexts.
pub fn categorize(value: f64, time_of_day: TimeOfDay) -> GlucoseCategory {
    let thresholds = Thresholds::for_time_of_day(time_of_day);

    if value < thresholds.hypoglycemic {
        GlucoseCategory::Hypoglycemic
    } else if value <= thresholds.normal_max {
        GlucoseCategory::Normal
    } else if value <= thresholds.prediabetic_max {
        GlucoseCategory::Prediabetic
    } else {
        GlucoseCategory::Diabetic
    }
}
