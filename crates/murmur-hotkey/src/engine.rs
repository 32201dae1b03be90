//! Capture engine: executes state machine outcomes against the pipeline.
//!
//! Lives on the global-hotkey listener thread and is driven synchronously by
//! raw key events. Arming starts the audio session (after the selection
//! side effect for modes that want it); finalizing stops the session and
//! hands the samples to a worker that transcribes, guards, classifies, and
//! schedules the dispatch back onto the UI actor. No step here may block on
//! the network: that is always worker territory.

use std::sync::Arc;
use std::time::{Duration, Instant};

use murmur_audio::CaptureControl;
use murmur_bridge::{guarded, spawn, UiHandle};
use murmur_chat::is_silence_artifact;
use murmur_dispatch::services::{SelectionAccess, SpeechToText};
use murmur_dispatch::{ActionDispatcher, AppState};
use murmur_router::IntentRouter;

use crate::machine::{CaptureStateMachine, KeyOutcome};

/// Clipboard polling step while waiting for a simulated copy to land.
const SELECTION_POLL_STEP_MS: u64 = 10;

/// Network-facing services the engine hands work to.
pub struct PipelineServices {
    pub stt: Arc<dyn SpeechToText>,
    pub selection: Arc<dyn SelectionAccess>,
    pub router: Arc<IntentRouter>,
    pub dispatcher: Arc<ActionDispatcher>,
}

/// Orchestrates one capture session at a time from key events.
pub struct CaptureEngine {
    machine: CaptureStateMachine,
    audio: Box<dyn CaptureControl>,
    services: PipelineServices,
    ui: UiHandle<AppState>,
    sample_rate: u32,
    selection_settle_ms: u64,
    /// Selection acquired at arm time, consumed at dispatch time.
    pending_selection: String,
}

impl CaptureEngine {
    pub fn new(
        machine: CaptureStateMachine,
        audio: Box<dyn CaptureControl>,
        services: PipelineServices,
        ui: UiHandle<AppState>,
        sample_rate: u32,
        selection_settle_ms: u64,
    ) -> Self {
        Self {
            machine,
            audio,
            services,
            ui,
            sample_rate,
            selection_settle_ms,
            pending_selection: String::new(),
        }
    }

    /// Entry point for the raw listener.
    pub fn handle_event(&mut self, event: &rdev::Event) {
        match event.event_type {
            rdev::EventType::KeyPress(key) => self.key_down(key),
            rdev::EventType::KeyRelease(key) => self.key_up(key),
            _ => {}
        }
    }

    pub fn key_down(&mut self, key: rdev::Key) {
        let outcome = self.machine.on_key_down(key);
        self.apply(outcome);
    }

    pub fn key_up(&mut self, key: rdev::Key) {
        let outcome = self.machine.on_key_up(key);
        self.apply(outcome);
    }

    pub fn is_capturing(&self) -> bool {
        self.machine.is_capturing()
    }

    fn apply(&mut self, outcome: KeyOutcome) {
        match outcome {
            KeyOutcome::Arm {
                mode_id,
                wants_selection,
            } => self.arm(&mode_id, wants_selection),
            KeyOutcome::Finalize { mode_id } => self.finalize(&mode_id),
            KeyOutcome::TogglePin => {
                let dispatcher = Arc::clone(&self.services.dispatcher);
                self.ui.schedule(move |state| dispatcher.toggle_pin(state));
            }
            KeyOutcome::ToggleSpeech => {
                let dispatcher = Arc::clone(&self.services.dispatcher);
                self.ui
                    .schedule(move |state| dispatcher.toggle_speech(state));
            }
            KeyOutcome::Ignored => {}
        }
    }

    fn arm(&mut self, mode_id: &str, wants_selection: bool) {
        self.pending_selection = if wants_selection {
            self.acquire_selection()
        } else {
            String::new()
        };

        if let Err(e) = self.audio.start(mode_id) {
            tracing::warn!(error = %e, mode = mode_id, "Could not start capture session");
            self.machine.reset();
            self.pending_selection.clear();
        }
    }

    /// Simulated-copy selection acquisition.
    ///
    /// After triggering the copy, polls the clipboard until its content
    /// changes or the settle budget elapses, then uses whatever is there.
    /// A fixed blind delay would race the copy landing; an unchanged
    /// clipboard at the deadline most often means the selection was already
    /// the clipboard content.
    fn acquire_selection(&self) -> String {
        let before =
            guarded("selection read", || self.services.selection.read_selection()).unwrap_or_default();
        if guarded("selection copy", || self.services.selection.capture_selection()).is_none() {
            return String::new();
        }

        let deadline = Instant::now() + Duration::from_millis(self.selection_settle_ms);
        loop {
            let current = guarded("selection read", || self.services.selection.read_selection())
                .unwrap_or_default();
            if (!current.is_empty() && current != before) || Instant::now() >= deadline {
                return current;
            }
            std::thread::sleep(Duration::from_millis(
                SELECTION_POLL_STEP_MS.min(self.selection_settle_ms.max(1)),
            ));
        }
    }

    fn finalize(&mut self, mode_id: &str) {
        let selection = std::mem::take(&mut self.pending_selection);
        let Some(samples) = self.audio.stop() else {
            tracing::debug!(mode = mode_id, "Session ended with no audio");
            return;
        };

        let stt = Arc::clone(&self.services.stt);
        let router = Arc::clone(&self.services.router);
        let dispatcher = Arc::clone(&self.services.dispatcher);
        let ui = self.ui.clone();
        let sample_rate = self.sample_rate;
        let mode = mode_id.to_string();

        spawn("transcription", move || {
            let Some(raw) = guarded("transcription", || stt.transcribe(&samples, sample_rate))
            else {
                return;
            };
            let transcript = raw.trim().to_string();
            if transcript.is_empty() {
                tracing::debug!(mode = %mode, "No speech detected");
                return;
            }
            if is_silence_artifact(&transcript) {
                tracing::info!(transcript = %transcript, "Ignored silence artifact");
                return;
            }

            let decision = router.classify(&transcript);
            ui.schedule(move |state| dispatcher.dispatch(state, decision, &selection));
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
