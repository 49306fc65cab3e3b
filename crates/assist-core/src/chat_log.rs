//! PostgreSQL chat log store
//!
//! Append-only persistence for interaction audit records using SQLx.
//! Records are inserted once and never updated or deleted.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::StorageConfig;
use crate::{AssistError, ChatLogEntry, Result};

/// PostgreSQL-backed chat log store
pub struct ChatLogStore {
    pool: PgPool,
    table: String,
}

impl ChatLogStore {
    /// Connect using the storage section of the application config.
    ///
    /// Missing coordinates are hard errors here, so a misconfigured service
    /// fails at construction time rather than on the first logged request.
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        let url = config.database_url.as_ref().ok_or_else(|| {
            AssistError::ConfigError("DATABASE_URL is required".to_string())
        })?;
        let table = config.chat_log_table.as_ref().ok_or_else(|| {
            AssistError::ConfigError("CHAT_LOG_TABLE is required".to_string())
        })?;

        Self::new(url, table, config.pool_size).await
    }

    /// Create a new chat log store connection
    pub async fn new(database_url: &str, table: &str, pool_size: u32) -> Result<Self> {
        validate_table_name(table)?;

        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .connect(database_url)
            .await
            .map_err(|e| AssistError::StorageError(format!("PostgreSQL connection failed: {e}")))?;

        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: PgPool, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    /// Create the audit table if it does not exist. Run once at startup.
    pub async fn init_schema(&self) -> Result<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                user_id TEXT NOT NULL,
                query TEXT NOT NULL,
                response TEXT NOT NULL,
                source TEXT NOT NULL,
                topic TEXT,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            self.table
        );

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AssistError::StorageError(format!("Failed to create log table: {e}")))?;

        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// The table name is interpolated into SQL text (bind parameters cannot name
/// tables), so restrict it to plain identifier characters.
fn validate_table_name(table: &str) -> Result<()> {
    let starts_ok = table
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if starts_ok && rest_ok {
        Ok(())
    } else {
        Err(AssistError::ConfigError(format!(
            "Invalid chat log table name: {table:?}"
        )))
    }
}

/// Trait for appending interaction records
#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    /// Append one audit record
    async fn append(&self, entry: &ChatLogEntry) -> Result<()>;
}

#[async_trait]
impl ChatLogRepository for ChatLogStore {
    async fn append(&self, entry: &ChatLogEntry) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, user_id, query, response, source, topic, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
            self.table
        );

        sqlx::query(&sql)
            .bind(entry.id)
            .bind(&entry.user_id)
            .bind(&entry.query)
            .bind(&entry.response)
            .bind(entry.source.as_str())
            .bind(&entry.topic)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| AssistError::StorageError(format!("Failed to append chat log: {e}")))?;

        Ok(())
    }
}
