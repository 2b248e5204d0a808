//! Application settings management

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// History database settings
    #[serde(default)]
    pub history: HistorySettings,

    /// Page analysis settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// LLM settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Report generation settings
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for analysis results
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Path to the browsing-history SQLite database
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// How many past days of history to analyze
    #[serde(default = "default_days_to_filter")]
    pub days_to_filter: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Maximum characters per content chunk sent to the LLM
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Overlap in characters between adjacent chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openai)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key (bearer token)
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default)]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// How many top categories to feed into the browsing summary prompt
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// How many top topics to feed into the browsing summary prompt
    #[serde(default = "default_top_topics")]
    pub top_topics: usize,

    /// How many sample descriptions to feed into the browsing summary prompt
    #[serde(default = "default_sample_descriptions")]
    pub sample_descriptions: usize,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "hindsight", "hindsight")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/hindsight"))
}

fn default_db_path() -> PathBuf {
    let mut path = default_data_dir();
    path.push("history.db");
    path
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_days_to_filter() -> i64 {
    7
}

fn default_max_content_length() -> usize {
    4000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_top_categories() -> usize {
    5
}

fn default_top_topics() -> usize {
    10
}

fn default_sample_descriptions() -> usize {
    10
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            days_to_filter: default_days_to_filter(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_content_length: default_max_content_length(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_categories: default_top_categories(),
            top_topics: default_top_topics(),
            sample_descriptions: default_sample_descriptions(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            history: HistorySettings::default(),
            analysis: AnalysisSettings::default(),
            llm: LlmSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.llm.api_key.trim().is_empty() {
            for var in ["HINDSIGHT_API_KEY", "OPENAI_API_KEY"] {
                if let Ok(key) = std::env::var(var) {
                    if !key.trim().is_empty() {
                        self.llm.api_key = key;
                        break;
                    }
                }
            }
        }

        if self.llm.endpoint.trim().is_empty() {
            if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
                if !url.trim().is_empty() {
                    self.llm.endpoint = url;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "hindsight", "hindsight")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Root directory for analysis outputs
    pub fn output_dir(&self) -> PathBuf {
        self.general.data_dir.join("analysis")
    }

    /// Dated output directory for one analysis run
    pub fn run_dir(&self, date: NaiveDate) -> PathBuf {
        self.output_dir().join(date.format("%Y-%m-%d").to_string())
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        std::fs::create_dir_all(self.output_dir())?;
        Ok(())
    }
}
