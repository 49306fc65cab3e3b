//! Stub capabilities for integration tests
//!
//! Builds a fully wired router with deterministic in-process stand-ins for
//! the embedding server, the LLM provider and the chat log, so API tests
//! run without external services.

use crate::state::AppState;
use assist_core::{
    AppConfig, ChatLogEntry, ChatLogRepository, KnowledgeBase, KnowledgeEntry, Result,
};
use assist_engine::{ChatCompletionClient, ChatEngine, ChatPrompt};
use assist_vector::EmbeddingClient;
use async_trait::async_trait;
use axum::Router;
use std::sync::{Arc, Mutex};

/// Embedder that puts the seeded question at the origin and everything
/// else far away
struct StubEmbedder;

#[async_trait]
impl EmbeddingClient for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(if text == "How do I reset my password?" {
            vec![0.0, 0.0]
        } else {
            vec![100.0, 100.0]
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        2
    }
}

/// LLM that answers the classifier by keyword and the persona with a
/// fixed suggestion
struct StubLlm;

#[async_trait]
impl ChatCompletionClient for StubLlm {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        if prompt.system().contains("'YES' or 'NO'") {
            let user = prompt.user().to_lowercase();
            let creative = user.contains("idea") || user.contains("brainstorm");
            Ok(if creative { "YES" } else { "NO" }.to_string())
        } else {
            Ok("Here are a few project ideas to get you started.".to_string())
        }
    }
}

/// In-memory chat log
#[derive(Default)]
struct MemoryLog {
    entries: Mutex<Vec<ChatLogEntry>>,
}

#[async_trait]
impl ChatLogRepository for MemoryLog {
    async fn append(&self, entry: &ChatLogEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Build a router backed entirely by stubs
pub async fn create_router_for_testing() -> Router {
    let config = AppConfig::default();
    let knowledge_base = KnowledgeBase::from_entries(vec![KnowledgeEntry::new(
        "How do I reset my password?",
        "Go to Settings > Security.",
        "Account",
    )]);

    let engine = ChatEngine::with_knowledge_base(
        &config,
        knowledge_base,
        Arc::new(StubEmbedder),
        Arc::new(StubLlm),
        Arc::new(MemoryLog::default()),
    )
    .await
    .expect("engine construction with stub capabilities");

    crate::create_router(Arc::new(AppState::new(config, engine)))
}
