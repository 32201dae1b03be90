//! External collaborator contracts.
//!
//! Everything the pipeline consumes over a network or desktop boundary is an
//! opaque request/response trait here: speech-to-text, completion, speech
//! synthesis, screenshots, typed output, clipboard selection, and the
//! presentation sinks invoked after dispatch outcomes. All methods block;
//! callers run them on worker threads, never on the UI actor.
//!
//! [`MockCollaborators`] implements every contract with canned replies and an
//! ordered event log, so component and pipeline tests can assert call order
//! without any real service.

use std::sync::Mutex;

use murmur_core::types::{MessageOrigin, PromptMessage, Role};
use murmur_core::{MurmurError, Result};
use murmur_router::IntentClassifier;

/// Speech-to-text boundary. An empty string means "no speech detected".
pub trait SpeechToText: Send + Sync {
    fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String>;
}

/// Chat / multimodal completion boundary.
pub trait CompletionService: Send + Sync {
    fn complete_chat(&self, messages: &[PromptMessage]) -> Result<String>;
    fn complete_vision(&self, messages: &[PromptMessage]) -> Result<String>;
}

/// Speech synthesis and playback boundary.
pub trait SpeechSynthesis: Send + Sync {
    fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>>;
    fn play(&self, audio: &[u8]) -> Result<()>;
}

/// Screen capture boundary.
pub trait ScreenshotSource: Send + Sync {
    fn capture_screenshot(&self) -> Result<Vec<u8>>;
}

/// Delivers text to the user's current input focus.
pub trait TypedOutput: Send + Sync {
    fn emit_typed_output(&self, text: &str) -> Result<()>;
}

/// Clipboard-backed selection context.
///
/// `capture_selection` triggers the simulated copy; `read_selection` reads
/// whatever the clipboard holds afterwards. The settle policy between the
/// two lives with the caller.
pub trait SelectionAccess: Send + Sync {
    fn capture_selection(&self) -> Result<()>;
    fn read_selection(&self) -> Result<String>;
}

/// Presentation collaborators invoked after dispatch outcomes.
pub trait PresentationSink: Send + Sync {
    fn log_chat_turn(&self, role: Role, text: &str, origin: MessageOrigin);
    fn log_answer(&self, text: &str);
    fn notify_status(&self, text: &str);
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Records every collaborator call in order and replies from canned values.
///
/// A `None` reply simulates a transient failure of that service.
#[derive(Debug, Default)]
pub struct MockCollaborators {
    events: Mutex<Vec<String>>,
    pub transcript_reply: Mutex<Option<String>>,
    pub chat_reply: Mutex<Option<String>>,
    pub vision_reply: Mutex<Option<String>>,
    pub classifier_reply: Mutex<Option<String>>,
    pub screenshot_reply: Mutex<Option<Vec<u8>>>,
    pub selection_reply: Mutex<String>,
}

impl MockCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: impl Into<String>) {
        self.events
            .lock()
            .expect("event log mutex poisoned")
            .push(event.into());
    }

    /// Snapshot of the ordered event log.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("event log mutex poisoned").clone()
    }

    /// Number of recorded events starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    /// Index of the first event starting with `prefix`, if any.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.events().iter().position(|e| e.starts_with(prefix))
    }
}

impl SpeechToText for MockCollaborators {
    fn transcribe(&self, _samples: &[f32], _sample_rate: u32) -> Result<String> {
        self.record("transcribe");
        self.transcript_reply
            .lock()
            .expect("reply mutex poisoned")
            .clone()
            .ok_or_else(|| MurmurError::Transcription("mock transcription failure".to_string()))
    }
}

impl CompletionService for MockCollaborators {
    fn complete_chat(&self, _messages: &[PromptMessage]) -> Result<String> {
        self.record("chat");
        self.chat_reply
            .lock()
            .expect("reply mutex poisoned")
            .clone()
            .ok_or_else(|| MurmurError::Completion("mock chat failure".to_string()))
    }

    fn complete_vision(&self, messages: &[PromptMessage]) -> Result<String> {
        let has_image = messages.last().is_some_and(|m| m.image.is_some());
        self.record(format!("vision:image={}", has_image));
        self.vision_reply
            .lock()
            .expect("reply mutex poisoned")
            .clone()
            .ok_or_else(|| MurmurError::Completion("mock vision failure".to_string()))
    }
}

impl IntentClassifier for MockCollaborators {
    fn classify_intent(&self, _prompt: &str) -> Result<String> {
        self.record("classify");
        self.classifier_reply
            .lock()
            .expect("reply mutex poisoned")
            .clone()
            .ok_or_else(|| MurmurError::Routing("mock classifier failure".to_string()))
    }
}

impl SpeechSynthesis for MockCollaborators {
    fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        self.record(format!("synthesize:{voice}:{text}"));
        Ok(vec![0u8; 4])
    }

    fn play(&self, _audio: &[u8]) -> Result<()> {
        self.record("play");
        Ok(())
    }
}

impl ScreenshotSource for MockCollaborators {
    fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.record("screenshot");
        self.screenshot_reply
            .lock()
            .expect("reply mutex poisoned")
            .clone()
            .ok_or_else(|| MurmurError::Screenshot("mock screenshot failure".to_string()))
    }
}

impl TypedOutput for MockCollaborators {
    fn emit_typed_output(&self, text: &str) -> Result<()> {
        self.record(format!("typed:{text}"));
        Ok(())
    }
}

impl SelectionAccess for MockCollaborators {
    fn capture_selection(&self) -> Result<()> {
        self.record("copy_selection");
        Ok(())
    }

    fn read_selection(&self) -> Result<String> {
        self.record("read_selection");
        Ok(self
            .selection_reply
            .lock()
            .expect("reply mutex poisoned")
            .clone())
    }
}

impl PresentationSink for MockCollaborators {
    fn log_chat_turn(&self, role: Role, text: &str, origin: MessageOrigin) {
        let tag = match origin {
            MessageOrigin::Voice => "voice",
            MessageOrigin::Screen => "screen",
        };
        self.record(format!("chat_turn:{role}:{tag}:{text}"));
    }

    fn log_answer(&self, text: &str) {
        self.record(format!("answer:{text}"));
    }

    fn notify_status(&self, text: &str) {
        self.record(format!("status:{text}"));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_event_order() {
        let mock = MockCollaborators::new();
        *mock.screenshot_reply.lock().unwrap() = Some(vec![1]);
        mock.capture_screenshot().unwrap();
        mock.emit_typed_output("hi").unwrap();
        assert_eq!(mock.events(), vec!["screenshot", "typed:hi"]);
        assert_eq!(mock.position("screenshot"), Some(0));
        assert_eq!(mock.count("typed:"), 1);
    }

    #[test]
    fn test_mock_none_reply_is_failure() {
        let mock = MockCollaborators::new();
        assert!(mock.complete_chat(&[]).is_err());
        assert!(mock.transcribe(&[0.0], 44_100).is_err());
        assert!(mock.capture_screenshot().is_err());
        assert!(mock.classify_intent("prompt").is_err());
    }

    #[test]
    fn test_mock_canned_replies() {
        let mock = MockCollaborators::new();
        *mock.chat_reply.lock().unwrap() = Some("the answer".to_string());
        *mock.transcript_reply.lock().unwrap() = Some("hello".to_string());
        assert_eq!(mock.complete_chat(&[]).unwrap(), "the answer");
        assert_eq!(mock.transcribe(&[0.0], 44_100).unwrap(), "hello");
    }

    #[test]
    fn test_mock_vision_records_image_presence() {
        let mock = MockCollaborators::new();
        *mock.vision_reply.lock().unwrap() = Some("a screenshot".to_string());
        let with_image = vec![PromptMessage {
            role: Role::User,
            content: "what is this".to_string(),
            image: Some(vec![9, 9]),
        }];
        mock.complete_vision(&with_image).unwrap();
        assert_eq!(mock.events(), vec!["vision:image=true"]);
    }
}
