use std::io::Write;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;
use crate::models::{ProcessedData, ReadingSet};

/// Example upload illustrating the expected two-column layout
pub const SAMPLE_CSV: &str = "Date,BloodSugar
2023-04-01T08:30:00,120
2023-04-01T18:45:00,145
2023-04-02T07:15:00,118
2023-04-02T19:30:00,135
2023-04-03T08:00:00,125
2023-04-03T20:00:00,155
2023-04-04T07:45:00,122
2023-04-04T19:15:00,140
2023-04-05T08:30:00,130
2023-04-05T18:30:00,150";

/// Header of the raw re-export, accepted by the importer
pub const RAW_HEADER: &str = "Date,BloodSugar";

/// Write the full report: reading rows, summary statistics, then insights
pub fn write_report<W: Write>(data: &ProcessedData, writer: &mut W) -> Result<()> {
    writeln!(writer, "Date,Time,Blood Sugar (mg/dL),Category")?;

    for reading in data.readings.all() {
        let timestamp = reading.timestamp();
        writeln!(
            writer,
            "{},{},{},{}",
            timestamp.format("%Y-%m-%d"),
            timestamp.format("%H:%M:%S"),
            reading.value(),
            reading.category()
        )?;
    }

    let stats = &data.stats;
    writeln!(writer)?;
    writeln!(writer, "Summary Statistics")?;
    writeln!(writer, "Average Blood Sugar,{:.1} mg/dL", stats.average)?;
    writeln!(writer, "Morning Average,{:.1} mg/dL", stats.morning_average)?;
    writeln!(writer, "Evening Average,{:.1} mg/dL", stats.evening_average)?;
    writeln!(writer, "Highest Reading,{} mg/dL", stats.max)?;
    writeln!(writer, "Lowest Reading,{} mg/dL", stats.min)?;
    writeln!(writer, "Morning Trend,{}", stats.morning_trend)?;
    writeln!(writer, "Evening Trend,{}", stats.evening_trend)?;
    writeln!(writer, "Normal Readings,{:.1}%", stats.normal_percentage)?;
    writeln!(writer, "Pre-diabetic Readings,{:.1}%", stats.prediabetic_percentage)?;
    writeln!(writer, "Diabetic Readings,{:.1}%", stats.diabetic_percentage)?;
    writeln!(writer, "Hypoglycemic Readings,{:.1}%", stats.hypoglycemic_percentage)?;

    writeln!(writer)?;
    writeln!(writer, "Insights")?;
    for insight in &data.insights {
        writeln!(writer, "{}", insight)?;
    }

    Ok(())
}

/// Write the readings back out as `Date,BloodSugar` rows in sorted order
pub fn write_raw<W: Write>(readings: &ReadingSet, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", RAW_HEADER)?;

    for reading in readings.all() {
        writeln!(
            writer,
            "{},{}",
            reading.timestamp().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            reading.value()
        )?;
    }

    Ok(())
}

/// Full report as text
pub fn report_to_string(data: &ProcessedData) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(data, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Raw two-column export as text
pub fn raw_to_string(readings: &ReadingSet) -> Result<String> {
    let mut buffer = Vec::new();
    write_raw(readings, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Export the full report to a file
#[instrument(skip_all, fields(path = %output_path.as_ref().display()))]
pub fn export_report<P: AsRef<Path>>(data: &ProcessedData, output_path: P) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    write_report(data, &mut file)
}

/// Export the raw readings to a file
#[instrument(skip_all, fields(path = %output_path.as_ref().display()))]
pub fn export_raw<P: AsRef<Path>>(readings: &ReadingSet, output_path: P) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    write_raw(readings, &mut file)
}

/// Write the sample upload to a file
pub fn export_sample<P: AsRef<Path>>(output_path: P) -> Result<()> {
    std::fs::write(output_path, SAMPLE_CSV)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::process_csv;
    use tempfile::NamedTempFile;

    #[test]
    fn test_report_layout() {
        let data = process_csv(
            "Date,BloodSugar\n2023-04-01T08:30:00,120\n2023-04-01T18:45:00,145.5\n2023-04-02T07:15:00,65",
        )
        .unwrap();
        let report = report_to_string(&data).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "Date,Time,Blood Sugar (mg/dL),Category");
        assert_eq!(lines[1], "2023-04-01,08:30:00,120,prediabetic");
        assert_eq!(lines[2], "2023-04-01,18:45:00,145.5,prediabetic");
        assert_eq!(lines[3], "2023-04-02,07:15:00,65,hypoglycemic");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Summary Statistics");
        assert_eq!(lines[6], "Average Blood Sugar,110.2 mg/dL");
        assert_eq!(lines[7], "Morning Average,92.5 mg/dL");
        assert_eq!(lines[8], "Evening Average,145.5 mg/dL");
        assert_eq!(lines[9], "Highest Reading,145.5 mg/dL");
        assert_eq!(lines[10], "Lowest Reading,65 mg/dL");
        assert_eq!(lines[11], "Morning Trend,stable");
        assert_eq!(lines[12], "Evening Trend,stable");
        assert_eq!(lines[13], "Normal Readings,0.0%");
        assert_eq!(lines[14], "Pre-diabetic Readings,66.7%");
        assert_eq!(lines[15], "Diabetic Readings,0.0%");
        assert_eq!(lines[16], "Hypoglycemic Readings,33.3%");
        assert_eq!(lines[17], "");
        assert_eq!(lines[18], "Insights");
        assert_eq!(&lines[19..], data.insights.iter().map(String::as_str).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_raw_export() {
        let data = process_csv("Date,BloodSugar\n2023-04-02T07:15:00,118\n2023-04-01T08:30:00,120.5").unwrap();
        let raw = raw_to_string(&data.readings).unwrap();

        assert_eq!(
            raw,
            "Date,BloodSugar\n2023-04-01T08:30:00.000Z,120.5\n2023-04-02T07:15:00.000Z,118\n"
        );
    }

    #[test]
    fn test_export_files() {
        let data = process_csv(SAMPLE_CSV).unwrap();

        let report_file = NamedTempFile::new().unwrap();
        export_report(&data, report_file.path()).unwrap();
        let content = std::fs::read_to_string(report_file.path()).unwrap();
        assert!(content.contains("Summary Statistics"));
        assert!(content.contains("2023-04-05,18:30:00,150,prediabetic"));

        let sample_file = NamedTempFile::new().unwrap();
        export_sample(sample_file.path()).unwrap();
        assert_eq!(std::fs::read_to_string(sample_file.path()).unwrap(), SAMPLE_CSV);

        let raw_file = NamedTempFile::new().unwrap();
        export_raw(&data.readings, raw_file.path()).unwrap();
        let raw = std::fs::read_to_string(raw_file.path()).unwrap();
        assert_eq!(raw.lines().count(), 11);
    }
}
