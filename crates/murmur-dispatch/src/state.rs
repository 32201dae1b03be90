//! The single mutable state container owned by the UI actor.
//!
//! Everything here is mutated only from scheduled callbacks on the UI loop;
//! workers and the listener thread reach it through the bridge. Single-writer
//! discipline, no locks.

use murmur_core::config::MurmurConfig;
use murmur_chat::{AnswerLog, ConversationHistory};

/// Mutable application state for one running instance.
#[derive(Debug)]
pub struct AppState {
    pub history: ConversationHistory,
    pub answers: AnswerLog,
    /// Whether assistant replies are spoken aloud.
    pub speech_enabled: bool,
    /// Voice used for spoken replies.
    pub speech_voice: String,
    /// Whether the chat surface stays visible instead of auto-hiding.
    pub chat_pinned: bool,
}

impl AppState {
    pub fn from_config(config: &MurmurConfig) -> Self {
        Self {
            history: ConversationHistory::new(config.history.token_budget),
            answers: AnswerLog::new(config.history.answer_log_capacity),
            speech_enabled: config.speech.enabled,
            speech_voice: config.speech.voice.clone(),
            chat_pinned: false,
        }
    }

    /// Flip speech output; returns the new value.
    pub fn toggle_speech(&mut self) -> bool {
        self.speech_enabled = !self.speech_enabled;
        self.speech_enabled
    }

    /// Flip the chat pin; returns the new value.
    pub fn toggle_pin(&mut self) -> bool {
        self.chat_pinned = !self.chat_pinned;
        self.chat_pinned
    }

    /// Drop all conversation state (history and answer log).
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.answers.clear();
    }
}
