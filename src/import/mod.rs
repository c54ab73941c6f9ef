use crate::error::Result;
use crate::models::ReadingSet;
use std::path::Path;
use thiserror::Error;

pub mod csv;

/// Trait for importing readings from different file formats
pub trait ImportFormat {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Import readings from the file
    fn import_file(&self, file_path: &Path) -> Result<ParseOutcome>;

    /// Get the format name for this importer
    fn get_format_name(&self) -> &'static str;
}

/// Readings that survived parsing, plus diagnostics for dropped lines
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub readings: ReadingSet,
    pub skipped: Vec<SkippedRow>,
}

/// A data line that was excluded from the result
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the input
    pub line: u64,

    /// Line content after field trimming
    pub content: String,

    pub reason: SkipReason,
}

/// Why a data line was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("expected at least 2 fields, found {0}")]
    TooFewFields(usize),

    #[error("invalid date: '{0}'")]
    InvalidDate(String),

    #[error("invalid blood sugar value: '{0}'")]
    InvalidValue(String),

    #[error("malformed line: {0}")]
    Malformed(String),
}
