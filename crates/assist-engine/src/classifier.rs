//! Intent classification
//!
//! Decides whether a query that missed the knowledge base is a creative
//! request (project ideas, brainstorming) or out of scope. The LLM is asked
//! for a bare YES/NO at temperature zero and the reply is interpreted
//! permissively, so "Yes." or "YES, it is" all count.

use std::sync::Arc;

use assist_core::Result;

use crate::llm::{ChatCompletionClient, ChatPrompt};

const CLASSIFIER_PROMPT: &str = "Analyze the user's query. Is it a request for project ideas, \
brainstorming help, or creative suggestions for academic work? Respond with only 'YES' or 'NO'.";

/// Classifies queries as creative requests or not
pub struct IntentClassifier {
    llm: Arc<dyn ChatCompletionClient>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn ChatCompletionClient>) -> Self {
        Self { llm }
    }

    /// Ask the LLM whether the query asks for ideas or brainstorming
    pub async fn classify(&self, query: &str) -> Result<bool> {
        let prompt = ChatPrompt::new(CLASSIFIER_PROMPT, query)?.with_temperature(0.0)?;
        let decision = self.llm.complete(&prompt).await?;
        tracing::debug!(decision = %decision.trim(), "Intent classified");
        Ok(is_yes(&decision))
    }
}

fn is_yes(decision: &str) -> bool {
    decision.trim().to_uppercase().contains("YES")
}

// ============================================================================
// Tests
// ============================================================================
