use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glucors::config::AppConfig;
use glucors::export::{self, json, text, ExportFormat};
use glucors::logging::{init_logging, LogFormat, LogLevel};
use glucors::{GlucoseError, ProcessedData, SkippedRow};

/// glucors - Blood Sugar Analysis CLI
///
/// Reads blood glucose readings from a CSV file with `Date` and
/// `BloodSugar` columns, classifies each reading and reports averages,
/// trends and insights.
#[derive(Parser)]
#[command(name = "glucors")]
#[command(version)]
#[command(about = "Blood Sugar Analysis CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a blood sugar CSV file
    Analyze {
        /// Input CSV file
        file: PathBuf,

        /// Also print every reading
        #[arg(short, long)]
        readings: bool,

        /// Print the full analysis as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Emit the day-indexed chart series as JSON
    Chart {
        /// Input CSV file
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the analysis or the cleaned readings
    Export {
        /// Input CSV file
        file: PathBuf,

        /// Export format (report, raw, chart, json)
        #[arg(short = 'f', long, default_value = "report")]
        format: ExportFormat,

        /// Output file (dated name in the configured directory if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a sample CSV file
    Sample {
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Print the effective configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(short, long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref());
    config.logging.level = LogLevel::from_verbosity(config.logging.level, cli.verbose);
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{} {:#}", "Failed to initialize logging:".yellow(), e);
    }

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<GlucoseError>() {
                Some(glucose_err) => {
                    eprintln!("{} {}", "Error:".red().bold(), glucose_err.user_message())
                }
                None => eprintln!("{} {:#}", "Error:".red().bold(), err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Analyze { file, readings, json: as_json } => {
            let data = load(&file)?;

            if as_json {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                json::write_processed_json(&data, &mut handle)?;
                return Ok(());
            }

            println!("{}", "Blood Sugar Analysis".blue().bold());
            println!("  File: {}", file.display());
            println!();
            print!("{}", text::render_summary(&data));
            println!();
            println!("{}", "Insights".blue().bold());
            print!("{}", text::render_insights(&data.insights));

            if readings {
                println!();
                println!("{}", text::render_readings_table(&data.readings));
            }
        }

        Commands::Chart { file, output } => {
            let data = load(&file)?;
            let series = glucors::chart_series(&data);

            match output {
                Some(path) => {
                    let mut writer = BufWriter::new(
                        File::create(&path)
                            .with_context(|| format!("Failed to create {}", path.display()))?,
                    );
                    json::write_chart_json(&series, &mut writer)?;
                    writer.flush()?;
                    println!("{} {}", "✓ Chart data written to".green(), path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    json::write_chart_json(&series, &mut handle)?;
                }
            }
        }

        Commands::Export { file, format, output } => {
            let data = load(&file)?;
            let path = output.unwrap_or_else(|| {
                config
                    .export
                    .output_path(format, Utc::now().date_naive())
            });

            export::export_to_file(&data, format, &path)?;
            println!("{} {}", "✓ Exported to".green(), path.display());
        }

        Commands::Sample { output } => {
            let path = output.unwrap_or_else(|| config.export.sample_path());
            export::csv::export_sample(&path)?;
            println!("{} {}", "✓ Sample written to".green(), path.display());
        }

        Commands::Config { show, init } => {
            if init {
                let path = match &cli.config {
                    Some(path) => {
                        config.save_to_file(path)?;
                        path.clone()
                    }
                    None => config.save_default()?,
                };
                println!("{} {}", "✓ Configuration written to".green(), path.display());
            }

            if show || !init {
                let rendered = toml::to_string_pretty(&config)
                    .context("Failed to render configuration")?;
                println!("{}", rendered);
            }
        }
    }

    Ok(())
}

/// Process `file`, reporting skipped lines on stderr
fn load(file: &Path) -> Result<ProcessedData> {
    let (data, skipped) = glucors::process_file(file)?;
    report_skipped(&skipped);
    Ok(data)
}

fn report_skipped(skipped: &[SkippedRow]) {
    if skipped.is_empty() {
        return;
    }

    eprintln!(
        "{}",
        format!("⚠ Skipped {} line(s) that could not be parsed", skipped.len()).yellow()
    );
    for row in skipped {
        eprintln!("{}", format!("  line {}: {} ({})", row.line, row.content, row.reason).dimmed());
    }
}
