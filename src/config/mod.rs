use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub transcription: TranscriptionConfig,
    pub extraction: ExtractionConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5050 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Endpoint that accepts a multipart audio upload and returns a transcript.
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Maximum accepted upload size in megabytes.
    pub max_upload_mb: u64,
    /// Total network attempts per `process_audio` call (1 = no internal retry).
    pub max_attempts: u32,
    /// Fixed delay between retry attempts.
    pub retry_delay_seconds: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/process-audio".to_string(),
            api_key: None,
            max_upload_mb: 25,
            max_attempts: 2,
            retry_delay_seconds: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Endpoint that accepts `{ transcript, entities }` and returns
    /// summary/actions/decisions.
    pub endpoint: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/process-json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Endpoint that accepts a batch of actions to schedule.
    pub endpoint: String,
    /// Optional endpoint returning `{ access_token }` for the calendar API.
    /// When unset, no Authorization header is attached.
    pub token_endpoint: Option<String>,
    pub default_duration_minutes: u32,
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/api/schedule-actions".to_string(),
            token_endpoint: None,
            default_duration_minutes: 60,
            min_duration_minutes: 5,
            max_duration_minutes: 480,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.transcription.max_upload_mb, 25);
        assert_eq!(config.transcription.max_attempts, 2);
        assert_eq!(config.calendar.default_duration_minutes, 60);
        assert_eq!(config.calendar.min_duration_minutes, 5);
        assert_eq!(config.calendar.max_duration_minutes, 480);
        assert!(config.calendar.token_endpoint.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
            [transcription]
            endpoint = "https://stt.example.com/upload"
            max_upload_mb = 50
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.transcription.endpoint, "https://stt.example.com/upload");
        assert_eq!(config.transcription.max_upload_mb, 50);
        // Untouched sections keep their defaults
        assert_eq!(config.transcription.max_attempts, 2);
        assert_eq!(config.server.port, 5050);
        assert_eq!(
            config.extraction.endpoint,
            "http://localhost:5000/process-json"
        );
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.calendar.token_endpoint = Some("http://localhost:3000/api/token".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            parsed.calendar.token_endpoint.as_deref(),
            Some("http://localhost:3000/api/token")
        );
    }
}
