//! Action dispatcher: executes a routing decision against the collaborators.
//!
//! Dispatch runs on the UI actor and mutates [`AppState`] directly; every
//! network round-trip hops to a fire-and-forget worker and re-enters through
//! the bridge. Failure semantics are uniform: an external call that fails or
//! returns nothing ends the turn with a log line and no partial state
//! mutation, keeping the capture path responsive regardless of network
//! behavior.

use std::sync::Arc;

use murmur_bridge::{guarded, spawn, UiHandle};
use murmur_chat::assemble;
use murmur_core::types::{
    ConversationMessage, MessageOrigin, PromptMessage, Role, RouterAction, RouterDecision,
};

use crate::services::{
    CompletionService, PresentationSink, ScreenshotSource, SpeechSynthesis, TypedOutput,
};
use crate::state::AppState;

/// External services the dispatcher drives.
pub struct Collaborators {
    pub completion: Arc<dyn CompletionService>,
    pub speech: Arc<dyn SpeechSynthesis>,
    pub screenshot: Arc<dyn ScreenshotSource>,
    pub typed: Arc<dyn TypedOutput>,
    pub presentation: Arc<dyn PresentationSink>,
}

/// Executes routing decisions. One instance per running application, shared
/// behind an `Arc` so worker closures can re-enter it.
pub struct ActionDispatcher {
    services: Collaborators,
    ui: UiHandle<AppState>,
    system_prompt: String,
    speech_max_chars: usize,
}

impl ActionDispatcher {
    pub fn new(
        services: Collaborators,
        ui: UiHandle<AppState>,
        system_prompt: String,
        speech_max_chars: usize,
    ) -> Self {
        Self {
            services,
            ui,
            system_prompt,
            speech_max_chars,
        }
    }

    /// Execute a decision. Runs in UI-actor context.
    pub fn dispatch(self: &Arc<Self>, state: &mut AppState, decision: RouterDecision, selection_text: &str) {
        tracing::info!(action = %decision.action, "Dispatching");
        match decision.action {
            RouterAction::Dictation => self.dispatch_dictation(state, &decision.text),
            RouterAction::Agent => self.dispatch_agent(state, decision.text, selection_text),
            RouterAction::Vision => self.dispatch_vision(state, decision.text, selection_text),
        }
    }

    /// Pure dictation: type it, remember it in the answer log, and leave the
    /// conversational context untouched.
    fn dispatch_dictation(&self, state: &mut AppState, text: &str) {
        guarded("typed output", || self.services.typed.emit_typed_output(text));
        state.answers.push(text);
        self.services.presentation.log_answer(text);
    }

    /// Conversational turn: assemble context from the current history, round
    /// trip through the chat model on a worker, then commit on the UI actor.
    fn dispatch_agent(self: &Arc<Self>, state: &mut AppState, user_text: String, selection_text: &str) {
        let messages = assemble(
            &self.system_prompt,
            &state.history,
            &user_text,
            selection_text,
            None,
        );
        let this = Arc::clone(self);
        spawn("chat-completion", move || {
            let Some(reply) =
                guarded("chat completion", || this.services.completion.complete_chat(&messages))
            else {
                return;
            };
            this.deliver(user_text, reply, MessageOrigin::Voice);
        });
    }

    /// Screen-context turn: the worker captures a screenshot first; without
    /// one the turn is abandoned before any completion call.
    fn dispatch_vision(self: &Arc<Self>, state: &mut AppState, user_text: String, selection_text: &str) {
        let messages = assemble(
            &self.system_prompt,
            &state.history,
            &user_text,
            selection_text,
            None,
        );
        let this = Arc::clone(self);
        spawn("vision-completion", move || {
            let Some(image) =
                guarded("screenshot", || this.services.screenshot.capture_screenshot())
            else {
                return;
            };
            let messages = attach_image(messages, image);
            let Some(reply) = guarded("vision completion", || {
                this.services.completion.complete_vision(&messages)
            }) else {
                return;
            };
            this.deliver(user_text, reply, MessageOrigin::Screen);
        });
    }

    /// Worker-side: hand a completed turn back to the UI actor, dropping
    /// empty replies.
    fn deliver(self: Arc<Self>, user_text: String, reply: String, origin: MessageOrigin) {
        if reply.trim().is_empty() {
            tracing::warn!("Empty completion reply; dropping turn");
            return;
        }
        let this = Arc::clone(&self);
        self.ui
            .schedule(move |state| this.commit_turn(state, user_text, reply, origin));
    }

    /// UI-actor side: record the turn and emit outputs. Only successful
    /// round-trips reach this point, so history mutation is all-or-nothing.
    fn commit_turn(&self, state: &mut AppState, user_text: String, reply: String, origin: MessageOrigin) {
        state
            .history
            .push(ConversationMessage::new(Role::User, user_text.clone(), origin));
        state.history.push(ConversationMessage::new(
            Role::Assistant,
            reply.clone(),
            MessageOrigin::Voice,
        ));
        state.answers.push(reply.clone());

        self.services.presentation.log_chat_turn(Role::User, &user_text, origin);
        self.services
            .presentation
            .log_chat_turn(Role::Assistant, &reply, MessageOrigin::Voice);
        guarded("typed output", || self.services.typed.emit_typed_output(&reply));
        self.speak(state, &reply);
    }

    /// Spoken output, when enabled: synthesize and play on a worker.
    fn speak(&self, state: &AppState, text: &str) {
        if !state.speech_enabled || text.is_empty() {
            return;
        }
        let clipped: String = text.chars().take(self.speech_max_chars).collect();
        let voice = state.speech_voice.clone();
        let speech = Arc::clone(&self.services.speech);
        spawn("speech-synthesis", move || {
            let Some(audio) =
                guarded("speech synthesis", || speech.synthesize_speech(&clipped, &voice))
            else {
                return;
            };
            guarded("speech playback", || speech.play(&audio));
        });
    }

    /// Pin toggle side effect (instantaneous, non-recording).
    pub fn toggle_pin(&self, state: &mut AppState) {
        let pinned = state.toggle_pin();
        self.services
            .presentation
            .notify_status(if pinned { "chat pinned" } else { "chat unpinned" });
    }

    /// Speech toggle side effect (instantaneous, non-recording).
    pub fn toggle_speech(&self, state: &mut AppState) {
        let enabled = state.toggle_speech();
        self.services
            .presentation
            .notify_status(if enabled { "speech on" } else { "speech off" });
    }
}

/// Attach the screenshot to the user turn at the tail of the message set.
fn attach_image(mut messages: Vec<PromptMessage>, image: Vec<u8>) -> Vec<PromptMessage> {
    if let Some(last) = messages.last_mut() {
        last.image = Some(image);
    }
    messages
}

// =============================================================================
// Tests
// =============================================================================
