//! Per-turn message set assembly for completion calls.

use murmur_core::types::{PromptMessage, Role};

use crate::history::ConversationHistory;

/// Build the outbound message list for one completion round-trip:
/// `[system, optional selection block, ...history..., user turn]`.
///
/// The user turn carries `image` when the dispatch is screen-context. The
/// assembled list is a snapshot; nothing here mutates history.
pub fn assemble(
    system_prompt: &str,
    history: &ConversationHistory,
    user_text: &str,
    selection_text: &str,
    image: Option<Vec<u8>>,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(PromptMessage::text(Role::System, system_prompt));

    if !selection_text.is_empty() {
        messages.push(PromptMessage::text(
            Role::System,
            format!("The user currently has this content selected:\n{}", selection_text),
        ));
    }

    for turn in history.messages() {
        messages.push(PromptMessage::text(turn.role, turn.content.clone()));
    }

    messages.push(PromptMessage {
        role: Role::User,
        content: user_text.to_string(),
        image,
    });
    messages
}

// =============================================================================
// Tests
// =============================================================================
