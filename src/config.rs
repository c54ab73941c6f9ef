use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::{dated_file_name, ExportFormat};
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Logging setup
    pub logging: LogConfig,

    /// Export file naming and location
    pub export: ExportSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Where exports are written and how they are named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory for exports written without an explicit path
    pub output_dir: PathBuf,

    /// File name prefix of the full report
    pub report_prefix: String,

    /// File name prefix of the raw CSV re-export
    pub raw_prefix: String,

    /// File name prefix of chart and JSON exports
    pub chart_prefix: String,

    /// File name of the sample CSV
    pub sample_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            logging: LogConfig::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            output_dir: PathBuf::from("."),
            report_prefix: "blood-sugar-report".to_string(),
            raw_prefix: "blood-sugar-data".to_string(),
            chart_prefix: "blood-sugar-chart".to_string(),
            sample_file_name: "blood-sugar-sample.csv".to_string(),
        }
    }
}

impl ExportSettings {
    /// Default output path for an export made on `date`
    pub fn output_path(&self, format: ExportFormat, date: NaiveDate) -> PathBuf {
        let prefix = match format {
            ExportFormat::Report => &self.report_prefix,
            ExportFormat::Raw => &self.raw_prefix,
            ExportFormat::Chart | ExportFormat::Json => &self.chart_prefix,
        };
        self.output_dir.join(dated_file_name(prefix, date, format))
    }

    /// Default output path for the sample CSV
    pub fn sample_path(&self) -> PathBuf {
        self.output_dir.join(&self.sample_file_name)
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".glucors")
            .join("config.toml")
    }

    /// Load configuration from `path` (or the default location), falling
    /// back to defaults when the file is missing or invalid
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(path = %config_path.display(), error = %err, "Using default configuration");
                Self::default()
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<PathBuf> {
        let config_path = Self::default_config_path();
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }
}
