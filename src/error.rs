//! Unified error hierarchy for glucors
//!
//! Terminal failures of the processing pipeline are `FormatError`s. Rows that
//! fail to parse are not errors at all: they are collected as
//! [`crate::import::SkippedRow`] diagnostics and the parse carries on.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all glucors operations
#[derive(Debug, Error)]
pub enum GlucoseError {
    /// The input could not be turned into a reading set
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// File type the importer does not handle
    #[error("Unsupported file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report or chart export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON/TOML serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Fatal problems with an uploaded CSV file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Fewer than a header plus one data line
    #[error("insufficient lines: expected a header and at least one reading, found {found} line(s)")]
    InsufficientLines { found: usize },

    /// Header lacks the date or blood sugar column marker
    #[error("missing required columns: expected Date and BloodSugar in header '{header}'")]
    MissingColumns { header: String },

    /// Every data line was rejected
    #[error("no valid readings: {skipped} line(s) skipped")]
    NoValidReadings { skipped: usize },
}

impl From<serde_json::Error> for GlucoseError {
    fn from(err: serde_json::Error) -> Self {
        GlucoseError::Serialization(err.to_string())
    }
}

/// Result type alias for glucors operations
pub type Result<T> = std::result::Result<T, GlucoseError>;

impl GlucoseError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GlucoseError::Format(_) => ErrorSeverity::Warning,
            GlucoseError::Configuration(_) => ErrorSeverity::Warning,
            GlucoseError::UnsupportedFile(_) => ErrorSeverity::Warning,
            GlucoseError::Io(_) => ErrorSeverity::Error,
            GlucoseError::Export(_) => ErrorSeverity::Error,
            GlucoseError::Serialization(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            GlucoseError::Format(FormatError::InsufficientLines { .. }) => {
                "Unable to process the uploaded file: it needs a header line and at least one reading."
                    .to_string()
            }
            GlucoseError::Format(FormatError::MissingColumns { .. }) => {
                "Unable to process the uploaded file: expected Date and BloodSugar columns."
                    .to_string()
            }
            GlucoseError::Format(FormatError::NoValidReadings { .. }) => {
                "Unable to process the uploaded file: no valid blood sugar readings were found."
                    .to_string()
            }
            GlucoseError::UnsupportedFile(path) => {
                format!("Please upload a CSV file ({} is not one).", path.display())
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Internal failure
    Critical,
    /// Error that prevents the operation
    Error,
    /// Bad user input
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = GlucoseError::Format(FormatError::InsufficientLines { found: 1 });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        assert_eq!(err.severity().to_tracing_level(), tracing::Level::WARN);

        let err = GlucoseError::Serialization("bad".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_format_error_messages() {
        let err = FormatError::MissingColumns {
            header: "timestamp,value".to_string(),
        };
        assert!(err.to_string().starts_with("missing required columns"));
        assert!(FormatError::NoValidReadings { skipped: 3 }
            .to_string()
            .starts_with("no valid readings"));
        assert!(FormatError::InsufficientLines { found: 1 }
            .to_string()
            .starts_with("insufficient lines"));
    }

    #[test]
    fn test_user_messages() {
        let err = GlucoseError::from(FormatError::MissingColumns {
            header: "x".to_string(),
        });
        assert!(err.user_message().contains("Date and BloodSugar"));

        let err = GlucoseError::Export("disk full".to_string());
        assert!(err.user_message().contains("disk full"));
    }
}
