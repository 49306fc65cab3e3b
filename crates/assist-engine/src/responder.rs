//! Creative response generation
//!
//! Answers brainstorming requests in the SynKro Assist persona. The LLM
//! reply is returned verbatim, no post-processing.

use std::sync::Arc;

use assist_core::Result;

use crate::llm::{ChatCompletionClient, ChatPrompt};

const PERSONA_PROMPT: &str = "You are SynKro Assist, a creative AI partner for a project \
platform. A user is asking for project ideas or brainstorming. Provide a few creative and \
helpful suggestions based on their query.";

/// Generates brainstorming answers in the assistant persona
pub struct CreativeResponder {
    llm: Arc<dyn ChatCompletionClient>,
}

impl CreativeResponder {
    pub fn new(llm: Arc<dyn ChatCompletionClient>) -> Self {
        Self { llm }
    }

    /// Generate suggestions for a creative query
    pub async fn respond(&self, query: &str) -> Result<String> {
        let prompt = ChatPrompt::new(PERSONA_PROMPT, query)?;
        self.llm.complete(&prompt).await
    }
}

// ============================================================================
// Tests
// ============================================================================
