//! SynKro Assist Core - Domain models, errors, and shared types
//!
//! This crate defines the core abstractions used throughout the SynKro Assist
//! backend:
//! - Knowledge base models (curated Q&A entries)
//! - The source tag vocabulary attached to every answer
//! - Chat responses and interaction log records
//! - Common error types
//! - Configuration management
//! - Chat log storage (PostgreSQL)

pub mod chat_log;
pub mod config;

pub use chat_log::{ChatLogRepository, ChatLogStore};
pub use config::{
    AppConfig, ConfigError, EmbeddingConfig, KnowledgeBaseConfig, LlmConfig, LoggingConfig,
    MatcherConfig, ServerConfig, StorageConfig,
};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for SynKro Assist operations
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBaseError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Search error: {0}")]
    SearchError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AssistError>;

// ============================================================================
// User Identity
// ============================================================================

/// Reserved user identifier meaning "unauthenticated caller".
pub const GUEST_USER_ID: &str = "guest";

/// Whether a user identifier denotes an unauthenticated guest.
///
/// Any value other than the sentinel is treated as an authenticated identity;
/// no further validation happens in this service.
pub fn is_guest(user_id: &str) -> bool {
    user_id == GUEST_USER_ID
}

// ============================================================================
// Source Tags
// ============================================================================

/// Which subsystem produced an answer.
///
/// The textual form appears verbatim both in chat responses and in the
/// interaction log. The set is closed; downstream consumers match on the
/// exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Curated knowledge base hit
    KnowledgeBase,
    /// Creative answer generated by the LLM provider
    Llm,
    /// Generation failed; the caller received the fixed apology
    Error,
    /// Neither a knowledge base match nor a creative request
    OutOfScope,
    /// Guest asked for a creative answer and was told to sign in
    AuthWall,
}

impl Source {
    /// The wire/log form of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeBase => "Knowledge Base",
            Self::Llm => "LLM (Groq)",
            Self::Error => "Error",
            Self::OutOfScope => "Out of Scope",
            Self::AuthWall => "Auth Wall",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Knowledge Base
// ============================================================================

/// One curated question/answer fact.
///
/// Entries are immutable after load and held for the process lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    /// Canonical phrasing of the question
    pub question: String,

    /// Curated answer text, returned verbatim on a match
    pub answer: String,

    /// Topic grouping; source records may omit it
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "Unknown".to_string()
}

impl KnowledgeEntry {
    /// Create a new entry
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
        }
    }
}

/// The ordered collection of curated entries, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Build a knowledge base from entries already in memory.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Load entries from a JSON file.
    ///
    /// A missing file is not an error: the service starts with an empty
    /// knowledge base and every query falls through to the LLM path. An
    /// unreadable or malformed file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "knowledge base file not found, starting with an empty knowledge base"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AssistError::KnowledgeBaseError(format!(
                "Failed to read knowledge base {}: {e}",
                path.display()
            ))
        })?;

        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&content).map_err(|e| {
            AssistError::KnowledgeBaseError(format!(
                "Failed to parse knowledge base {}: {e}",
                path.display()
            ))
        })?;

        Ok(Self { entries })
    }

    /// All entries, in load order.
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Entry at position `index`, matching the vector index layout.
    pub fn get(&self, index: usize) -> Option<&KnowledgeEntry> {
        self.entries.get(index)
    }

    /// The question texts, in load order.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.question.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Chat Response
// ============================================================================

/// The value returned to the caller for one chat query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    /// Answer text shown to the user
    pub answer: String,

    /// Which subsystem produced it
    pub source: Source,
}

impl ChatResponse {
    /// Create a new response
    pub fn new(answer: impl Into<String>, source: Source) -> Self {
        Self {
            answer: answer.into(),
            source,
        }
    }
}

// ============================================================================
// Interaction Log
// ============================================================================

/// Append-only audit record of one non-guest interaction.
///
/// Records are never updated or deleted; ordering is insertion order.
#[derive(Debug, Clone)]
pub struct ChatLogEntry {
    /// Unique identifier
    pub id: Uuid,

    /// Caller identity (never the guest sentinel; guests are not logged)
    pub user_id: String,

    /// The raw query text
    pub query: String,

    /// The answer text that was returned
    pub response: String,

    /// Which subsystem produced the answer
    pub source: Source,

    /// Optional topic (knowledge base category or a fixed pipeline topic)
    pub topic: Option<String>,

    /// Creation timestamp, UTC
    pub created_at: DateTime<Utc>,
}

impl ChatLogEntry {
    /// Create a record stamped with the current UTC time.
    pub fn new(
        user_id: impl Into<String>,
        query: impl Into<String>,
        response: impl Into<String>,
        source: Source,
        topic: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            query: query.into(),
            response: response.into(),
            source,
            topic,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
