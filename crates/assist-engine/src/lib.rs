//! # Assist Engine
//!
//! The chat pipeline behind SynKro Assist. A query flows through:
//!
//! - **Matcher**: nearest-neighbour search over embedded knowledge base
//!   questions, answered directly on a confident hit
//! - **Classifier**: LLM YES/NO decision on whether a miss is a creative
//!   request (ideas, brainstorming)
//! - **Access gate**: creative generation is members-only, guests get a
//!   sign-in prompt
//! - **Responder**: persona-framed LLM generation for creative requests
//! - **Logger**: one interaction row per answered member query
//!
//! [`ChatEngine`] wires these together and owns the degradation policy:
//! classification failures fall back to out-of-scope, generation failures
//! to an apology.

pub mod access;
pub mod classifier;
pub mod engine;
pub mod llm;
pub mod logger;
pub mod matcher;
pub mod responder;

pub use access::allow_creative;
pub use classifier::IntentClassifier;
pub use engine::{
    ChatEngine, GENERATION_FAILED_MESSAGE, OUT_OF_SCOPE_MESSAGE, SIGN_IN_MESSAGE,
};
pub use llm::{ChatCompletionClient, ChatPrompt, GroqClient};
pub use logger::InteractionLogger;
pub use matcher::{similarity_from_distance, KbMatch, KnowledgeMatcher};
pub use responder::CreativeResponder;
