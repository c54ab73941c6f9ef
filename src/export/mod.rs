use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GlucoseError, Result};
use crate::models::ProcessedData;

pub mod chart;
pub mod csv;
pub mod json;
pub mod text;

/// File exports available for a processed upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Per-reading rows, summary statistics and insights
    Report,
    /// Two-column `Date,BloodSugar` re-export
    Raw,
    /// Day-indexed chart series as JSON
    Chart,
    /// The full processed data model as JSON
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = GlucoseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "report" | "full" => Ok(ExportFormat::Report),
            "raw" | "csv" => Ok(ExportFormat::Raw),
            "chart" => Ok(ExportFormat::Chart),
            "json" => Ok(ExportFormat::Json),
            _ => Err(GlucoseError::Export(format!("Unsupported format: {}", s))),
        }
    }
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Report | ExportFormat::Raw => "csv",
            ExportFormat::Chart | ExportFormat::Json => "json",
        }
    }
}

/// `<prefix>-<YYYY-MM-DD>.<ext>`, as used for downloads
pub fn dated_file_name(prefix: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!("{}-{}.{}", prefix, date.format("%Y-%m-%d"), format.extension())
}

/// Write `data` to `output_path` in the requested format
pub fn export_to_file(data: &ProcessedData, format: ExportFormat, output_path: &Path) -> Result<()> {
    match format {
        ExportFormat::Report => csv::export_report(data, output_path),
        ExportFormat::Raw => csv::export_raw(&data.readings, output_path),
        ExportFormat::Chart => {
            let mut file = std::fs::File::create(output_path)?;
            json::write_chart_json(&chart::to_chart_series(&data.readings), &mut file)
        }
        ExportFormat::Json => {
            let mut file = std::fs::File::create(output_path)?;
            json::write_processed_json(data, &mut file)
        }
    }
}
