// Library interface for glucors
// The binary and integration tests both go through these modules

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod insights;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod stats;
pub mod thresholds;
pub mod trend;

// Re-export commonly used types for convenience
pub use models::*;
pub use pipeline::{analyze, chart_series, process_csv, process_csv_with_diagnostics, process_file};
pub use export::ExportFormat;
pub use import::{SkipReason, SkippedRow};
pub use thresholds::Thresholds;
pub use error::{GlucoseError, FormatError, Result};
pub use logging::{LogConfig, LogLevel, LogFormat};
