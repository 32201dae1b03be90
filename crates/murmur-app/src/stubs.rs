//! Stub collaborators for running without any configured services.
//!
//! API clients, screenshots, clipboard, and typed output are external
//! integrations wired in by the embedding build. Each stub either logs what
//! it would have delivered or fails like an unreachable service, so the
//! pipeline's degrade-to-log behavior is exercised end to end.

use murmur_core::types::{MessageOrigin, PromptMessage, Role};
use murmur_core::{MurmurError, Result};
use murmur_dispatch::services::{
    CompletionService, PresentationSink, ScreenshotSource, SelectionAccess, SpeechSynthesis,
    SpeechToText, TypedOutput,
};
use murmur_router::IntentClassifier;

/// No-service placeholder implementing every collaborator contract.
pub struct StubCollaborators;

impl SpeechToText for StubCollaborators {
    fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String> {
        tracing::warn!(
            samples = samples.len(),
            sample_rate,
            "No speech-to-text client configured"
        );
        Err(MurmurError::Transcription(
            "no speech-to-text client configured".to_string(),
        ))
    }
}

impl CompletionService for StubCollaborators {
    fn complete_chat(&self, _messages: &[PromptMessage]) -> Result<String> {
        Err(MurmurError::Completion(
            "no chat completion client configured".to_string(),
        ))
    }

    fn complete_vision(&self, _messages: &[PromptMessage]) -> Result<String> {
        Err(MurmurError::Completion(
            "no vision completion client configured".to_string(),
        ))
    }
}

impl IntentClassifier for StubCollaborators {
    fn classify_intent(&self, _prompt: &str) -> Result<String> {
        Err(MurmurError::Routing(
            "no classification client configured".to_string(),
        ))
    }
}

impl SpeechSynthesis for StubCollaborators {
    fn synthesize_speech(&self, _text: &str, voice: &str) -> Result<Vec<u8>> {
        Err(MurmurError::Speech(format!(
            "no speech synthesis client configured (voice '{}')",
            voice
        )))
    }

    fn play(&self, _audio: &[u8]) -> Result<()> {
        Ok(())
    }
}

impl ScreenshotSource for StubCollaborators {
    fn capture_screenshot(&self) -> Result<Vec<u8>> {
        Err(MurmurError::Screenshot(
            "no screenshot provider configured".to_string(),
        ))
    }
}

impl TypedOutput for StubCollaborators {
    fn emit_typed_output(&self, text: &str) -> Result<()> {
        tracing::info!(text, "Typed output (no injector configured)");
        Ok(())
    }
}

impl SelectionAccess for StubCollaborators {
    fn capture_selection(&self) -> Result<()> {
        Ok(())
    }

    fn read_selection(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl PresentationSink for StubCollaborators {
    fn log_chat_turn(&self, role: Role, text: &str, origin: MessageOrigin) {
        tracing::info!(%role, ?origin, text, "Chat turn");
    }

    fn log_answer(&self, text: &str) {
        tracing::info!(text, "Answer logged");
    }

    fn notify_status(&self, text: &str) {
        tracing::info!(text, "Status");
    }
}
