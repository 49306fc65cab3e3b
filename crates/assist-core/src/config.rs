//! SynKro Assist configuration management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development. Credentials and storage
//! coordinates have no defaults: they must be present or startup fails.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Embedding server configuration
    pub embedding: EmbeddingConfig,

    /// Chat log storage
    pub storage: StorageConfig,

    /// Knowledge base matching
    pub matcher: MatcherConfig,

    /// Knowledge base source
    pub knowledge_base: KnowledgeBaseConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // LLM (Groq serves the OpenAI-compatible chat completions API)
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(secs) = std::env::var("LLM_TIMEOUT_SECS") {
            config.llm.timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LLM_TIMEOUT_SECS".to_string(),
                value: secs,
            })?;
        }
        if let Ok(retries) = std::env::var("LLM_MAX_RETRIES") {
            config.llm.max_retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LLM_MAX_RETRIES".to_string(),
                value: retries,
            })?;
        }

        // Embedding server
        if let Ok(url) = std::env::var("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(secs) = std::env::var("EMBEDDING_TIMEOUT_SECS") {
            config.embedding.timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "EMBEDDING_TIMEOUT_SECS".to_string(),
                value: secs,
            })?;
        }

        // Storage
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.storage.database_url = Some(url);
        }
        if let Ok(table) = std::env::var("CHAT_LOG_TABLE") {
            config.storage.chat_log_table = Some(table);
        }

        // Matching
        if let Ok(threshold) = std::env::var("MATCH_THRESHOLD") {
            let parsed: f32 = threshold.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MATCH_THRESHOLD".to_string(),
                value: threshold.clone(),
            })?;
            // Similarity lives in (0, 1], so a threshold outside that range
            // would accept everything or nothing.
            if !(0.0..=1.0).contains(&parsed) {
                return Err(ConfigError::InvalidValue {
                    key: "MATCH_THRESHOLD".to_string(),
                    value: threshold,
                });
            }
            config.matcher.threshold = parsed;
        }

        // Knowledge base
        if let Ok(path) = std::env::var("KNOWLEDGE_BASE_PATH") {
            config.knowledge_base.path = PathBuf::from(path);
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Check the settings that must be present before the service starts.
    ///
    /// Called from `main` so a missing credential or missing storage
    /// coordinates abort the process before the server binds, never lazily on
    /// the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.is_none() {
            return Err(ConfigError::MissingRequired("GROQ_API_KEY".to_string()));
        }
        if self.storage.database_url.is_none() {
            return Err(ConfigError::MissingRequired("DATABASE_URL".to_string()));
        }
        if self.storage.chat_log_table.is_none() {
            return Err(ConfigError::MissingRequired("CHAT_LOG_TABLE".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            // The platform frontend during development
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider API key; required at startup
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL
    pub base_url: String,

    /// Model name to use for both classification and generation
    pub model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for transient provider errors (429, 5xx, timeouts)
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-8b-8192".to_string(),
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Embedding server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama-compatible embedding server URL
    pub base_url: String,

    /// Embedding model name
    pub model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat log storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// PostgreSQL connection URL; required at startup
    pub database_url: Option<String>,

    /// Audit table name; required at startup
    pub chat_log_table: Option<String>,

    /// Connection pool size
    pub pool_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            chat_log_table: None,
            pool_size: 5,
        }
    }
}

/// Knowledge base matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum similarity for accepting a knowledge base match.
    ///
    /// Empirically tuned; raising it trades recall for precision.
    pub threshold: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { threshold: 0.65 }
    }
}

/// Knowledge base source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Path to the knowledge base JSON file
    pub path: PathBuf,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("knowledge_base/knowledge_base.json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, "llama3-8b-8192");
        assert_eq!(config.llm.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.embedding.model, "all-minilm");
        assert!((config.matcher.threshold - 0.65).abs() < f32::EPSILON);
        assert_eq!(
            config.knowledge_base.path,
            PathBuf::from("knowledge_base/knowledge_base.json")
        );
    }

    #[test]
    fn test_validate_requires_credential_and_storage() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(key)) if key == "GROQ_API_KEY"
        ));

        config.llm.api_key = Some("gsk_test".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(key)) if key == "DATABASE_URL"
        ));

        config.storage.database_url = Some("postgres://localhost/synkro".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(key)) if key == "CHAT_LOG_TABLE"
        ));

        config.storage.chat_log_table = Some("chat_logs".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial_toml() {
        let path = std::env::temp_dir().join(format!("assist-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
            [server]
            port = 9001

            [matcher]
            threshold = 0.8
            "#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.port, 9001);
        assert!((config.matcher.threshold - 0.8).abs() < f32::EPSILON);
        // Untouched sections keep their defaults
        assert_eq!(config.llm.model, "llama3-8b-8192");
    }

    #[test]
    fn test_from_file_missing() {
        let result = AppConfig::from_file("/nonexistent/assist.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError { .. })));
    }
}
