//! Chat pipeline orchestration
//!
//! Every query runs the same route: knowledge base first, then intent
//! classification, then either creative generation (members only) or the
//! out-of-scope reply. The engine owns all capabilities and decides how
//! failures degrade, so callers only see an answer or a hard error.

use std::sync::Arc;

use assist_core::{
    AppConfig, AssistError, ChatLogRepository, ChatResponse, KnowledgeBase, Result, Source,
};
use assist_vector::EmbeddingClient;

use crate::access::allow_creative;
use crate::classifier::IntentClassifier;
use crate::llm::ChatCompletionClient;
use crate::logger::InteractionLogger;
use crate::matcher::KnowledgeMatcher;
use crate::responder::CreativeResponder;

/// Reply for guests asking for brainstorming help
pub const SIGN_IN_MESSAGE: &str = "Brainstorming and project ideas are available to signed-in \
members. Please sign in to your SynKro account and ask me again.";

/// Apology returned when creative generation fails
pub const GENERATION_FAILED_MESSAGE: &str =
    "I'm having trouble brainstorming right now. Please try again in a moment.";

/// Reply for queries outside the assistant's scope
pub const OUT_OF_SCOPE_MESSAGE: &str = "I can only answer questions about how to use the SynKro \
platform or help with brainstorming project ideas. Could you please rephrase your question?";

const CREATIVE_TOPIC: &str = "Creative Request";
const OUT_OF_SCOPE_TOPIC: &str = "Out of Scope";

/// The chat pipeline: matcher, classifier, responder and interaction log
pub struct ChatEngine {
    matcher: KnowledgeMatcher,
    classifier: IntentClassifier,
    responder: CreativeResponder,
    logger: InteractionLogger,
}

impl ChatEngine {
    /// Build the engine, loading the knowledge base from the configured path
    pub async fn new(
        config: &AppConfig,
        embedder: Arc<dyn EmbeddingClient>,
        llm: Arc<dyn ChatCompletionClient>,
        log_store: Arc<dyn ChatLogRepository>,
    ) -> Result<Self> {
        let knowledge_base = KnowledgeBase::load(&config.knowledge_base.path)?;
        Self::with_knowledge_base(config, knowledge_base, embedder, llm, log_store).await
    }

    /// Build the engine with an already loaded knowledge base
    pub async fn with_knowledge_base(
        config: &AppConfig,
        knowledge_base: KnowledgeBase,
        embedder: Arc<dyn EmbeddingClient>,
        llm: Arc<dyn ChatCompletionClient>,
        log_store: Arc<dyn ChatLogRepository>,
    ) -> Result<Self> {
        let matcher =
            KnowledgeMatcher::build(knowledge_base, embedder, config.matcher.threshold).await?;

        Ok(Self {
            matcher,
            classifier: IntentClassifier::new(llm.clone()),
            responder: CreativeResponder::new(llm),
            logger: InteractionLogger::new(log_store),
        })
    }

    /// Number of knowledge base entries behind the matcher
    pub fn knowledge_entries(&self) -> usize {
        self.matcher.len()
    }

    /// Similarity threshold the matcher applies
    pub fn match_threshold(&self) -> f32 {
        self.matcher.threshold()
    }

    /// Dimension of the embedding space in use
    pub fn embedding_dimension(&self) -> usize {
        self.matcher.embedding_dimension()
    }

    /// Answer one query for one user.
    ///
    /// Classification failures degrade to the out-of-scope reply and
    /// generation failures to an apology, so the only hard errors left are
    /// validation and embedding lookups.
    pub async fn answer(&self, query: &str, user_id: &str) -> Result<ChatResponse> {
        if query.trim().is_empty() {
            return Err(AssistError::ValidationError(
                "Query must not be empty".to_string(),
            ));
        }

        let kb_match = self.matcher.match_query(query).await?;
        if let Some(entry) = kb_match.entry {
            tracing::info!(similarity = kb_match.similarity, "Knowledge base hit");
            self.logger
                .record(
                    user_id,
                    query,
                    &entry.answer,
                    Source::KnowledgeBase,
                    Some(entry.category.clone()),
                )
                .await;
            return Ok(ChatResponse::new(entry.answer, Source::KnowledgeBase));
        }

        let is_creative = match self.classifier.classify(query).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(error = %e, "Intent classification failed, treating as out of scope");
                false
            }
        };

        if !allow_creative(is_creative, user_id) {
            tracing::info!("Guest asked for brainstorming, returning sign-in prompt");
            return Ok(ChatResponse::new(SIGN_IN_MESSAGE, Source::AuthWall));
        }

        if is_creative {
            return match self.responder.respond(query).await {
                Ok(answer) => {
                    self.logger
                        .record(
                            user_id,
                            query,
                            &answer,
                            Source::Llm,
                            Some(CREATIVE_TOPIC.to_string()),
                        )
                        .await;
                    Ok(ChatResponse::new(answer, Source::Llm))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Creative generation failed, returning apology");
                    self.logger
                        .record(
                            user_id,
                            query,
                            GENERATION_FAILED_MESSAGE,
                            Source::Error,
                            None,
                        )
                        .await;
                    Ok(ChatResponse::new(GENERATION_FAILED_MESSAGE, Source::Error))
                }
            };
        }

        tracing::debug!("Query out of scope, returning redirect message");
        self.logger
            .record(
                user_id,
                query,
                OUT_OF_SCOPE_MESSAGE,
                Source::OutOfScope,
                Some(OUT_OF_SCOPE_TOPIC.to_string()),
            )
            .await;
        Ok(ChatResponse::new(OUT_OF_SCOPE_MESSAGE, Source::OutOfScope))
    }

    /// Whether the matcher has any entries to search
    pub fn knowledge_base_is_empty(&self) -> bool {
        self.matcher.is_empty()
    }
}
