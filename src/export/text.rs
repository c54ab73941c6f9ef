use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{GlucoseCategory, ProcessedData, ReadingSet};

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "mg/dL")]
    value: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Category")]
    category: String,
}

/// Human-readable summary of statistics, trends and category shares
pub fn render_summary(data: &ProcessedData) -> String {
    let stats = &data.stats;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Readings: {} ({} morning, {} evening)",
        data.readings.len(),
        data.readings.morning().len(),
        data.readings.evening().len()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Averages");
    let _ = writeln!(out, "  Overall: {:.1} mg/dL", stats.average);
    let _ = writeln!(out, "  Morning: {:.1} mg/dL", stats.morning_average);
    let _ = writeln!(out, "  Evening: {:.1} mg/dL", stats.evening_average);
    let _ = writeln!(out, "  Range:   {} - {} mg/dL", stats.min, stats.max);
    let _ = writeln!(out);
    let _ = writeln!(out, "Trends");
    let _ = writeln!(out, "  Morning: {}", stats.morning_trend.label());
    let _ = writeln!(out, "  Evening: {}", stats.evening_trend.label());
    let _ = writeln!(out);
    let _ = writeln!(out, "Categories");
    for category in GlucoseCategory::ALL {
        let _ = writeln!(out, "  {:<13} {:>5.1}%", category, stats.percentage(category));
    }

    out
}

/// Bulleted insight list
pub fn render_insights(insights: &[String]) -> String {
    insights
        .iter()
        .map(|insight| format!("• {}\n", insight))
        .collect()
}

/// Table of every reading in timestamp order
pub fn render_readings_table(readings: &ReadingSet) -> String {
    let rows: Vec<ReadingRow> = readings
        .all()
        .iter()
        .map(|r| ReadingRow {
            date: r.timestamp().format("%Y-%m-%d").to_string(),
            time: r.timestamp().format("%H:%M").to_string(),
            value: r.value().to_string(),
            period: r.time_of_day().to_string(),
            category: r.category().to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
