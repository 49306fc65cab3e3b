//! Access control for the creative path
//!
//! Knowledge base answers are open to everyone, guests included. Creative
//! generation spends LLM quota, so it is reserved for signed-in members.

use assist_core::is_guest;

/// Whether the user may take the creative path.
///
/// Non-creative traffic is never gated here.
pub fn allow_creative(is_creative: bool, user_id: &str) -> bool {
    !(is_creative && is_guest(user_id))
}
