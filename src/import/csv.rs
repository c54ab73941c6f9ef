use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{FormatError, Result};
use crate::import::{ImportFormat, ParseOutcome, SkipReason, SkippedRow};
use crate::models::{Reading, ReadingSet};

/// Header substring identifying the timestamp column
const DATE_MARKER: &str = "date";

/// Header substring identifying the glucose column
const BLOOD_SUGAR_MARKER: &str = "bloodsugar";

/// Naive date-time layouts, interpreted as UTC
const DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Timestamps keep millisecond precision, matching the raw export
const SUBSEC_DIGITS: u16 = 3;

/// Importer for `Date,BloodSugar` CSV exports.
///
/// Only the first two fields of each line are read; extra columns are
/// ignored and quoting is not interpreted.
#[derive(Debug, Default)]
pub struct CsvImporter;

impl CsvImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV text into a sorted reading set.
    ///
    /// Bad lines are skipped and reported in the outcome; only structural
    /// problems with the file as a whole are errors.
    pub fn parse_str(&self, content: &str) -> Result<ParseOutcome> {
        let line_count = content.lines().count();
        if line_count < 2 {
            return Err(FormatError::InsufficientLines { found: line_count }.into());
        }

        let header = content.lines().next().unwrap_or_default();
        if !Self::header_is_valid(header) {
            return Err(FormatError::MissingColumns {
                header: header.trim().to_string(),
            }
            .into());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let mut readings = Vec::new();
        let mut skipped = Vec::new();

        for result in reader.records() {
            match result {
                Ok(record) => {
                    // whitespace-only line; `,` and the like are reported below
                    if record.len() == 1 && record[0].is_empty() {
                        continue;
                    }

                    match Self::parse_record(&record) {
                        Ok(reading) => readings.push(reading),
                        Err(reason) => {
                            let line = record.position().map(|p| p.line()).unwrap_or_default();
                            skipped.push(Self::skip(line, record.iter().collect::<Vec<_>>().join(","), reason));
                        }
                    }
                }
                Err(err) => {
                    let line = err.position().map(|p| p.line()).unwrap_or_default();
                    skipped.push(Self::skip(line, String::new(), SkipReason::Malformed(err.to_string())));
                }
            }
        }

        if readings.is_empty() {
            return Err(FormatError::NoValidReadings {
                skipped: skipped.len(),
            }
            .into());
        }

        let readings = ReadingSet::new(readings);
        info!(
            readings = readings.len(),
            morning = readings.morning().len(),
            evening = readings.evening().len(),
            skipped = skipped.len(),
            "Parsed blood sugar CSV"
        );

        Ok(ParseOutcome { readings, skipped })
    }

    /// Case- and whitespace-insensitive check for both required columns
    pub fn header_is_valid(header: &str) -> bool {
        let normalized: String = header
            .trim_start_matches('\u{feff}')
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        normalized.contains(DATE_MARKER) && normalized.contains(BLOOD_SUGAR_MARKER)
    }

    /// Parse a timestamp; naive values are taken as UTC.
    ///
    /// Sub-millisecond digits are truncated.
    pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
        Self::parse_datetime_exact(date_str).map(|dt| dt.trunc_subsecs(SUBSEC_DIGITS))
    }

    fn parse_datetime_exact(date_str: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in &DATETIME_FORMATS {
            if let Ok(naive_dt) = NaiveDateTime::parse_from_str(date_str, format) {
                return Some(Utc.from_utc_datetime(&naive_dt));
            }
        }

        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive_dt| Utc.from_utc_datetime(&naive_dt))
    }

    /// Parse a glucose value from the longest leading decimal number, so
    /// `120 mg/dL` reads as 120. Must be finite and non-negative.
    pub fn parse_value(value_str: &str) -> Option<f64> {
        numeric_prefix(value_str)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    fn parse_record(record: &StringRecord) -> std::result::Result<Reading, SkipReason> {
        if record.len() < 2 {
            return Err(SkipReason::TooFewFields(record.len()));
        }

        let date_str = &record[0];
        let value_str = &record[1];

        let timestamp = Self::parse_datetime(date_str)
            .ok_or_else(|| SkipReason::InvalidDate(date_str.to_string()))?;
        let value = Self::parse_value(value_str)
            .ok_or_else(|| SkipReason::InvalidValue(value_str.to_string()))?;

        Reading::new(timestamp, value).ok_or_else(|| SkipReason::InvalidValue(value_str.to_string()))
    }

    fn skip(line: u64, content: String, reason: SkipReason) -> SkippedRow {
        warn!(line, content = %content, reason = %reason, "Skipping invalid line");
        SkippedRow {
            line,
            content,
            reason,
        }
    }
}

/// Longest prefix of `s` of the form `[+-]digits[.digits][(e|E)[+-]digits]`;
/// empty when `s` does not start with a number
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }

    if !has_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    &s[..end]
}

impl ImportFormat for CsvImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase() == "csv")
            .unwrap_or(false)
    }

    fn import_file(&self, file_path: &Path) -> Result<ParseOutcome> {
        let content = std::fs::read_to_string(file_path)?;
        self.parse_str(&content)
    }

    fn get_format_name(&self) -> &'static str {
        "CSV"
    }
}
