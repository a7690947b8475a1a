//! Prompt assembly and reply acceptance

use lead_qualifier_core::ChatMessage;

pub use lead_qualifier_core::{ChatMessage as Message, Role};

/// Instruction prepended to every conversation sent to the model
pub const SYSTEM_PROMPT: &str = "You are a helpful insurance intake assistant. \
Gather the user's details conversationally: Name, Age, State, Coverage type (health/life/auto), \
Existing provider, Budget/month, Urgency (1–5). \
Be concise and friendly, asking one or two questions per turn.";

/// A model reply must be longer than this, after trimming, to be used
pub const MIN_REPLY_CHARS: usize = 10;

/// System prompt followed by the caller's history
///
/// System messages supplied by the caller are dropped so the intake
/// instruction stays the only one.
pub fn build_messages(history: &[ChatMessage]) -> Vec<Message> {
    std::iter::once(Message::system(SYSTEM_PROMPT))
        .chain(
            history
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        )
        .collect()
}

/// The trimmed reply, if it is substantial enough to prefer over the
/// deterministic one
pub fn accept_reply(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (trimmed.chars().count() > MIN_REPLY_CHARS).then(|| trimmed.to_string())
}
