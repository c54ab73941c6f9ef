use std::io::Write;

use crate::error::Result;
use crate::models::{ChartSeries, ProcessedData};

/// Write the chart series as pretty JSON; missing values become `null`
pub fn write_chart_json<W: Write>(series: &ChartSeries, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, series)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the whole processed data model as pretty JSON
pub fn write_processed_json<W: Write>(data: &ProcessedData, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, data)?;
    writeln!(writer)?;
    Ok(())
}
