//! Entry points used by the presentation layer.
//!
//! Each call builds a fresh, independent data model; nothing is cached
//! between calls.

use std::path::Path;
use tracing::{debug, error, instrument, warn, Level};

use crate::error::{GlucoseError, Result};
use crate::export::chart::to_chart_series;
use crate::import::csv::CsvImporter;
use crate::import::{ImportFormat, ParseOutcome, SkippedRow};
use crate::insights::InsightGenerator;
use crate::models::{ChartSeries, ProcessedData, ReadingSet};
use crate::stats::StatisticsCalculator;

/// Parse CSV text and run the full analysis
pub fn process_csv(content: &str) -> Result<ProcessedData> {
    process_csv_with_diagnostics(content).map(|(data, _)| data)
}

/// Like [`process_csv`], also returning the lines that were skipped
#[instrument(skip_all, fields(bytes = content.len()))]
pub fn process_csv_with_diagnostics(content: &str) -> Result<(ProcessedData, Vec<SkippedRow>)> {
    let outcome = CsvImporter::new().parse_str(content).map_err(log_failure)?;
    Ok(from_outcome(outcome))
}

/// Read and analyze a `.csv` file
#[instrument(skip_all, fields(path = %file_path.display()))]
pub fn process_file(file_path: &Path) -> Result<(ProcessedData, Vec<SkippedRow>)> {
    let importer = CsvImporter::new();
    if !importer.can_import(file_path) {
        return Err(log_failure(GlucoseError::UnsupportedFile(file_path.to_path_buf())));
    }

    debug!(format = importer.get_format_name(), "Importing file");
    let outcome = importer.import_file(file_path).map_err(log_failure)?;
    Ok(from_outcome(outcome))
}

/// Compute statistics and insights for an already parsed reading set
pub fn analyze(readings: ReadingSet) -> ProcessedData {
    let stats = StatisticsCalculator::calculate(&readings);
    let insights = InsightGenerator::generate(&readings, &stats);

    ProcessedData {
        readings,
        stats,
        insights,
    }
}

/// Chart projection of processed data
pub fn chart_series(data: &ProcessedData) -> ChartSeries {
    to_chart_series(&data.readings)
}

fn from_outcome(outcome: ParseOutcome) -> (ProcessedData, Vec<SkippedRow>) {
    (analyze(outcome.readings), outcome.skipped)
}

fn log_failure(err: GlucoseError) -> GlucoseError {
    if err.severity().to_tracing_level() == Level::ERROR {
        error!(error = %err, "Unable to process blood sugar data");
    } else {
        warn!(error = %err, "Unable to process blood sugar data");
    }
    err
}
