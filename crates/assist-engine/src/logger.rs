//! Interaction logging
//!
//! Persists one row per answered query for analytics. Guest interactions
//! are never persisted, and a failing store must not fail the request that
//! produced the answer, so write errors are reported and dropped.

use std::sync::Arc;

use assist_core::{is_guest, ChatLogEntry, ChatLogRepository, Source};

/// Records answered interactions through a [`ChatLogRepository`]
pub struct InteractionLogger {
    store: Arc<dyn ChatLogRepository>,
}

impl InteractionLogger {
    pub fn new(store: Arc<dyn ChatLogRepository>) -> Self {
        Self { store }
    }

    /// Record one interaction. Guests are skipped, write failures are
    /// logged and swallowed.
    pub async fn record(
        &self,
        user_id: &str,
        query: &str,
        response: &str,
        source: Source,
        topic: Option<String>,
    ) {
        if is_guest(user_id) {
            tracing::debug!("Guest interaction, not persisted");
            return;
        }

        let entry = ChatLogEntry::new(user_id, query, response, source, topic);
        match self.store.append(&entry).await {
            Ok(()) => {
                tracing::info!(
                    target: "audit",
                    user_id = %entry.user_id,
                    source = %entry.source,
                    topic = ?entry.topic,
                    "Interaction logged"
                );
            }
            Err(e) => {
                tracing::warn!(
                    target: "audit",
                    user_id = %entry.user_id,
                    error = %e,
                    "Failed to persist interaction, dropping entry"
                );
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::{AssistError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<Vec<ChatLogEntry>>,
    }

    #[async_trait]
    impl ChatLogRepository for MemoryStore {
        async fn append(&self, entry: &ChatLogEntry) -> Result<()> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ChatLogRepository for FailingStore {
        async fn append(&self, _entry: &ChatLogEntry) -> Result<()> {
            Err(AssistError::StorageError("connection lost".to_string()))
        }
    }

    #[test]
    fn test_records_member_interaction() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::default());
            let logger = InteractionLogger::new(store.clone());

            logger
                .record(
                    "alice",
                    "How do I reset my password?",
                    "Go to Settings > Security.",
                    Source::KnowledgeBase,
                    Some("Account".to_string()),
                )
                .await;

            let entries = store.entries.lock().unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].user_id, "alice");
            assert_eq!(entries[0].source, Source::KnowledgeBase);
            assert_eq!(entries[0].topic.as_deref(), Some("Account"));
        });
    }

    #[test]
    fn test_guest_interactions_skipped() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::default());
            let logger = InteractionLogger::new(store.clone());

            logger
                .record("guest", "hello", "hi", Source::OutOfScope, None)
                .await;

            assert!(store.entries.lock().unwrap().is_empty());
        });
    }

    #[test]
    fn test_store_failure_is_swallowed() {
        tokio_test::block_on(async {
            let logger = InteractionLogger::new(Arc::new(FailingStore));

            // Must not panic or propagate.
            logger
                .record("alice", "query", "answer", Source::Llm, None)
                .await;
        });
    }
}
