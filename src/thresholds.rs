//! Medical cutoffs for blood glucose classification (mg/dL).
//!
//! Morning readings are treated as fasting measurements and evening readings
//! as postprandial ones, following ADA guidance.

use crate::models::TimeOfDay;
use serde::{Deserialize, Serialize};

/// Cutoffs for one measurement context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Values strictly below this are hypoglycemic
    pub hypoglycemic: f64,

    /// Upper bound (inclusive) of the normal range
    pub normal_max: f64,

    /// Upper bound (inclusive) of the prediabetic range
    pub prediabetic_max: f64,
}

/// Fasting (morning) cutoffs
pub const FASTING: Thresholds = Thresholds {
    hypoglycemic: 70.0,
    normal_max: 99.0,
    prediabetic_max: 125.0,
};

/// Postprandial (evening) cutoffs
pub const POSTPRANDIAL: Thresholds = Thresholds {
    hypoglycemic: 70.0,
    normal_max: 139.0,
    prediabetic_max: 199.0,
};

impl Thresholds {
    /// Cutoffs that apply to readings taken at the given time of day
    pub fn for_time_of_day(time_of_day: TimeOfDay) -> &'static Thresholds {
        match time_of_day {
            TimeOfDay::Morning => &FASTING,
            TimeOfDay::Evening => &POSTPRANDIAL,
        }
    }
}
