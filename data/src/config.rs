//! Dashboard configuration.
//!
//! Defines the YAML-serializable settings for the store location, the seed
//! files and the AI assistant. Every field has a default, so an empty file
//! (or no file at all) yields a working configuration. The assistant API key
//! is never stored in the file; it comes from the process environment.
//!
//! # Example YAML
//!
//! ```yaml
//! database: dashboard.db
//! data_dir: DATA
//! seed_files:
//!   incidents: cyber_incidents.csv
//!   datasets: datasets_metadata.csv
//!   tickets: it_tickets.csv
//! log_level: info
//! assistant:
//!   endpoint: https://openrouter.ai/api/v1/chat/completions
//!   model: openai/gpt-oss-20b:free
//!   temperature: 0.2
//!   max_tokens: 400
//!   timeout_secs: 30
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable carrying the assistant API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// File names of the three domain seed files, relative to
/// [`DashboardConfig::data_dir`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedFiles {
    pub incidents: PathBuf,
    pub datasets: PathBuf,
    pub tickets: PathBuf,
}

impl Default for SeedFiles {
    fn default() -> Self {
        Self {
            incidents: PathBuf::from("cyber_incidents.csv"),
            datasets: PathBuf::from("datasets_metadata.csv"),
            tickets: PathBuf::from("it_tickets.csv"),
        }
    }
}

/// Settings for the outbound AI completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Chat-completions endpoint (OpenAI-compatible).
    pub endpoint: String,
    /// Model identifier sent with every request.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    /// Value of the `HTTP-Referer` identification header.
    pub referer: String,
    /// Value of the `X-Title` identification header.
    pub title: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "openai/gpt-oss-20b:free".to_string(),
            temperature: 0.2,
            max_tokens: 400,
            timeout_secs: 30,
            referer: "http://localhost:8501".to_string(),
            title: "Operations Intelligence Dashboard".to_string(),
        }
    }
}

/// Top-level dashboard configuration.
///
/// # Examples
///
/// ```
/// use dashboard_data::DashboardConfig;
///
/// let config: DashboardConfig = serde_yaml::from_str("database: ops.db").unwrap();
/// assert_eq!(config.database.to_str(), Some("ops.db"));
/// assert_eq!(config.data_dir.to_str(), Some("DATA"));
/// assert_eq!(config.assistant.max_tokens, 400);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// SQLite store file.
    pub database: PathBuf,
    /// Directory holding the seed CSV files.
    pub data_dir: PathBuf,
    pub seed_files: SeedFiles,
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub assistant: AssistantSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("dashboard.db"),
            data_dir: PathBuf::from("DATA"),
            seed_files: SeedFiles::default(),
            log_level: "warn".to_string(),
            assistant: AssistantSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DataError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DataError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Full path of the incidents seed file.
    pub fn incidents_csv(&self) -> PathBuf {
        self.data_dir.join(&self.seed_files.incidents)
    }

    /// Full path of the datasets seed file.
    pub fn datasets_csv(&self) -> PathBuf {
        self.data_dir.join(&self.seed_files.datasets)
    }

    /// Full path of the tickets seed file.
    pub fn tickets_csv(&self) -> PathBuf {
        self.data_dir.join(&self.seed_files.tickets)
    }

    /// Reads the assistant API key from [`API_KEY_ENV`].
    ///
    /// An unset or blank variable means the assistant runs offline.
    pub fn api_key() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}
