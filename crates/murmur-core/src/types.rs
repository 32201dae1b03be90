//! Shared domain types for the voice interaction pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rough token estimate for budgeting conversation history (~4 chars/token).
///
/// This is a cheap length-proportional proxy, never an exact count.
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Where a stored user turn came from.
///
/// Screen-context turns carry the tag as data; presentation collaborators
/// decide how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    #[default]
    Voice,
    Screen,
}

/// One turn in the bounded conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    /// Length-proportional cost proxy, fixed at construction.
    pub estimated_cost: usize,
    pub origin: MessageOrigin,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>, origin: MessageOrigin) -> Self {
        let content = content.into();
        let estimated_cost = estimate_tokens(&content);
        Self {
            role,
            content,
            estimated_cost,
            origin,
        }
    }
}

/// One entry in the recent-answer log shown by presentation surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerLogEntry {
    pub text: String,
    /// Wall-clock label in `%H:%M` form.
    pub timestamp: String,
}

/// An outbound message assembled for a completion call.
///
/// The image is present only on the final user turn of a screen-context
/// dispatch.
#[derive(Debug, Clone)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
    pub image: Option<Vec<u8>>,
}

impl PromptMessage {
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            image: None,
        }
    }
}

/// Completion behavior selected for a finalized transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouterAction {
    Dictation,
    Agent,
    Vision,
}

impl fmt::Display for RouterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterAction::Dictation => write!(f, "DICTATION"),
            RouterAction::Agent => write!(f, "AGENT"),
            RouterAction::Vision => write!(f, "VISION"),
        }
    }
}

/// Classification result for one finalized transcript. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterDecision {
    pub action: RouterAction,
    pub text: String,
}

impl RouterDecision {
    pub fn new(action: RouterAction, text: impl Into<String>) -> Self {
        Self {
            action,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_proxy() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens(&"x".repeat(4000)), 1000);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_message_origin_default_is_voice() {
        assert_eq!(MessageOrigin::default(), MessageOrigin::Voice);
    }

    #[test]
    fn test_conversation_message_cost_fixed_at_construction() {
        let msg = ConversationMessage::new(Role::User, "hello world!", MessageOrigin::Voice);
        assert_eq!(msg.estimated_cost, 3);
        assert_eq!(msg.content, "hello world!");
    }

    #[test]
    fn test_conversation_message_screen_origin() {
        let msg = ConversationMessage::new(Role::User, "what is this", MessageOrigin::Screen);
        assert_eq!(msg.origin, MessageOrigin::Screen);
    }

    #[test]
    fn test_prompt_message_text_has_no_image() {
        let msg = PromptMessage::text(Role::System, "be brief");
        assert!(msg.image.is_none());
        assert_eq!(msg.role, Role::System);
    }

    #[test]
    fn test_router_action_wire_form_is_uppercase() {
        assert_eq!(serde_json::to_string(&RouterAction::Vision).unwrap(), "\"VISION\"");
        let action: RouterAction = serde_json::from_str("\"DICTATION\"").unwrap();
        assert_eq!(action, RouterAction::Dictation);
    }

    #[test]
    fn test_router_action_rejects_unknown_value() {
        let parsed: std::result::Result<RouterAction, _> = serde_json::from_str("\"SHOUT\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_router_action_display() {
        assert_eq!(RouterAction::Dictation.to_string(), "DICTATION");
        assert_eq!(RouterAction::Agent.to_string(), "AGENT");
        assert_eq!(RouterAction::Vision.to_string(), "VISION");
    }

    #[test]
    fn test_router_decision_new() {
        let decision = RouterDecision::new(RouterAction::Agent, "what time is it");
        assert_eq!(decision.action, RouterAction::Agent);
        assert_eq!(decision.text, "what time is it");
    }
}
