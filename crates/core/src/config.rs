//! Configuration management for the Sikkim Tourism Assistant.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults matching the production deployment
//! - Config file (sikkim.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Precedence is lowest to highest in that order.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options shared by the HTTP
/// server and the CLI commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Address the HTTP server binds to
    pub host: String,

    /// Port the HTTP server binds to
    pub port: u16,

    /// Base URL of the Ollama backend
    pub ollama_url: String,

    /// Generation model identifier (must appear in the backend's model list)
    pub model: String,

    /// Path to the fixed Q&A knowledge base file
    pub qa_file: PathBuf,

    /// Minimum effective score for a fixed Q&A match (inclusive)
    pub match_threshold: f32,

    /// Timeout for the backend availability probe, in seconds
    pub probe_timeout_secs: u64,

    /// Timeout for a non-streamed generation call, in seconds
    pub generate_timeout_secs: u64,

    /// Timeout for a streamed generation call, in seconds
    pub stream_timeout_secs: u64,

    /// Delay between chunks when streaming a materialized answer, in ms
    pub stream_delay_ms: u64,

    /// Sampling options passed to the generation backend
    pub generation: GenerationSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Sampling options for the generation backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub temperature: f32,

    #[serde(rename = "topP")]
    pub top_p: f32,

    #[serde(rename = "repeatPenalty")]
    pub repeat_penalty: f32,

    #[serde(rename = "numCtx")]
    pub num_ctx: u32,

    #[serde(rename = "numPredict")]
    pub num_predict: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            repeat_penalty: 1.1,
            num_ctx: 4096,
            num_predict: 512,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    server: Option<ServerConfig>,
    ollama: Option<OllamaConfig>,
    knowledge: Option<KnowledgeConfig>,
    chat: Option<ChatConfig>,
    generation: Option<GenerationSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
struct OllamaConfig {
    url: Option<String>,
    model: Option<String>,
    #[serde(rename = "probeTimeoutSecs")]
    probe_timeout_secs: Option<u64>,
    #[serde(rename = "generateTimeoutSecs")]
    generate_timeout_secs: Option<u64>,
    #[serde(rename = "streamTimeoutSecs")]
    stream_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct KnowledgeConfig {
    #[serde(rename = "qaFile")]
    qa_file: Option<String>,
    #[serde(rename = "matchThreshold")]
    match_threshold: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatConfig {
    #[serde(rename = "streamDelayMs")]
    stream_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
            ollama_url: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
            qa_file: PathBuf::from("data/fixed_qa.json"),
            match_threshold: 0.6,
            probe_timeout_secs: 2,
            generate_timeout_secs: 10,
            stream_timeout_secs: 30,
            stream_delay_ms: 50,
            generation: GenerationSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `SIKKIM_CONFIG`: Path to config file (default: ./sikkim.yaml)
    /// - `SIKKIM_HOST`: Server bind address
    /// - `SIKKIM_PORT`: Server port
    /// - `SIKKIM_OLLAMA_URL`: Ollama base URL
    /// - `SIKKIM_MODEL`: Generation model identifier
    /// - `SIKKIM_QA_FILE`: Path to the fixed Q&A file
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("SIKKIM_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            PathBuf::from("sikkim.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(host) = std::env::var("SIKKIM_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("SIKKIM_PORT") {
            config.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid SIKKIM_PORT: {}", port)))?;
        }

        if let Ok(url) = std::env::var("SIKKIM_OLLAMA_URL") {
            config.ollama_url = url;
        }

        if let Ok(model) = std::env::var("SIKKIM_MODEL") {
            config.model = model;
        }

        if let Ok(qa_file) = std::env::var("SIKKIM_QA_FILE") {
            config.qa_file = PathBuf::from(qa_file);
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(server) = config_file.server {
            if let Some(host) = server.host {
                result.host = host;
            }
            if let Some(port) = server.port {
                result.port = port;
            }
        }

        if let Some(ollama) = config_file.ollama {
            if let Some(url) = ollama.url {
                result.ollama_url = url;
            }
            if let Some(model) = ollama.model {
                result.model = model;
            }
            if let Some(secs) = ollama.probe_timeout_secs {
                result.probe_timeout_secs = secs;
            }
            if let Some(secs) = ollama.generate_timeout_secs {
                result.generate_timeout_secs = secs;
            }
            if let Some(secs) = ollama.stream_timeout_secs {
                result.stream_timeout_secs = secs;
            }
        }

        if let Some(knowledge) = config_file.knowledge {
            if let Some(qa_file) = knowledge.qa_file {
                result.qa_file = PathBuf::from(qa_file);
            }
            if let Some(threshold) = knowledge.match_threshold {
                result.match_threshold = threshold;
            }
        }

        if let Some(chat) = config_file.chat {
            if let Some(delay) = chat.stream_delay_ms {
                result.stream_delay_ms = delay;
            }
        }

        if let Some(generation) = config_file.generation {
            result.generation = generation;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        ollama_url: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(ollama_url) = ollama_url {
            self.ollama_url = ollama_url;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(AppError::Config(format!(
                "matchThreshold must be within [0, 1], got {}",
                self.match_threshold
            )));
        }

        if self.port == 0 {
            return Err(AppError::Config("Server port must be non-zero".to_string()));
        }

        if self.probe_timeout_secs == 0 || self.generate_timeout_secs == 0 {
            return Err(AppError::Config(
                "Backend timeouts must be non-zero".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model name must not be empty".to_string()));
        }

        Ok(())
    }
}
