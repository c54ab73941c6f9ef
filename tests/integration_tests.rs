use glucors::export::{self, csv::SAMPLE_CSV, ExportFormat};
use glucors::{process_csv, process_file, GlucoseCategory, TimeOfDay, TrendDirection};
use std::fs;
use tempfile::tempdir;

/// Integration tests that run the complete upload-to-export workflow

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_sample_upload_workflow() {
        let data = process_csv(SAMPLE_CSV).unwrap();

        assert_eq!(data.readings.len(), 10);
        assert_eq!(data.stats.morning_trend, TrendDirection::Increasing);
        assert_eq!(data.stats.evening_trend, TrendDirection::Increasing);
        assert!((data.stats.normal_percentage - 10.0).abs() < 1e-9);
        assert!((data.stats.prediabetic_percentage - 80.0).abs() < 1e-9);
        assert!((data.stats.diabetic_percentage - 10.0).abs() < 1e-9);
        assert_eq!(data.stats.hypoglycemic_percentage, 0.0);

        assert_eq!(data.insights.len(), 5);
        assert!(data.insights[0].contains("morning (fasting) blood sugar is trending upward"));
        assert!(data.insights[1].contains("(123 mg/dL)"));
        assert!(data.insights[2].contains("evening blood sugar readings are trending upward"));
        assert!(data.insights[3].contains("(145 mg/dL)"));
        assert!(data.insights[4].starts_with("Only 10% of your readings"));
    }

    #[test]
    fn test_raw_export_reimports_identically() {
        let original = process_csv(SAMPLE_CSV).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");

        export::export_to_file(&original, ExportFormat::Raw, &path).unwrap();
        let (reimported, skipped) = process_file(&path).unwrap();

        assert!(skipped.is_empty());
        assert_eq!(reimported.readings.len(), original.readings.len());
        for (a, b) in original
            .readings
            .all()
            .iter()
            .zip(reimported.readings.all())
        {
            assert_eq!(a.timestamp(), b.timestamp());
            assert_eq!(a.value(), b.value());
            assert_eq!(a.category(), b.category());
            assert_eq!(a.time_of_day(), b.time_of_day());
        }
        assert_eq!(reimported.stats, original.stats);
    }

    #[test]
    fn test_report_export_file() {
        let data = process_csv(SAMPLE_CSV).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");

        export::export_to_file(&data, ExportFormat::Report, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.starts_with("Date,Time,Blood Sugar (mg/dL),Category\n2023-04-01,08:30:00,120,prediabetic"));
        assert!(content.contains("Summary Statistics"));
        assert!(content.contains("Average Blood Sugar,134.0 mg/dL"));
        assert!(content.contains("Morning Trend,increasing"));
        assert!(content.contains("Insights"));
    }

    #[test]
    fn test_hypoglycemia_insight_and_ordering() {
        let csv = "Date,BloodSugar\n\
                   2023-04-02T07:00:00,65\n\
                   2023-04-01T08:00:00,90\n\
                   2023-04-01T19:00:00,120";
        let data = process_csv(csv).unwrap();

        let days: Vec<String> = data.readings.all().iter().map(|r| r.day_key()).collect();
        assert_eq!(days, vec!["2023-04-01", "2023-04-01", "2023-04-02"]);
        assert_eq!(data.readings.count_category(GlucoseCategory::Hypoglycemic), 1);
        assert!(data
            .insights
            .iter()
            .any(|i| i.starts_with("You have 1 blood sugar reading(s) below 70 mg/dL")));
    }

    #[test]
    fn test_chart_series_alignment() {
        let csv = "Date,BloodSugar\n\
                   2023-04-01T08:00:00,100\n\
                   2023-04-01T09:00:00,300\n\
                   2023-04-02T19:00:00,140";
        let data = process_csv(csv).unwrap();
        let series = glucors::chart_series(&data);

        assert_eq!(series.dates, vec!["2023-04-01", "2023-04-02"]);
        assert_eq!(series.morning_values, vec![Some(100.0), None]);
        assert_eq!(series.evening_values, vec![None, Some(140.0)]);

        let json = serde_json::to_value(&series).unwrap();
        assert!(json["morning_values"][1].is_null());
    }

    #[test]
    fn test_timezone_offsets_are_normalized() {
        let csv = "Date,BloodSugar\n2023-04-01T13:30:00+02:00,95";
        let data = process_csv(csv).unwrap();
        let reading = data.readings.all()[0];

        assert_eq!(reading.time_of_day(), TimeOfDay::Morning);
        assert_eq!(reading.category(), GlucoseCategory::Normal);
    }

    #[test]
    fn test_sample_export_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.csv");

        export::csv::export_sample(&path).unwrap();
        let (data, _) = process_file(&path).unwrap();
        assert_eq!(data, process_csv(SAMPLE_CSV).unwrap());
    }
}
