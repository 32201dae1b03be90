//! Capture state machine driven by raw key events.
//!
//! Two states: Idle and Capturing(mode). A qualifying key-down arms a
//! session only from Idle; while capturing, every other binding (including
//! the instantaneous toggles) is suppressed so it cannot corrupt the
//! in-progress utterance. Hold configurations finalize on key-up of the
//! armed binding's key set; toggle configurations finalize on a re-press.
//!
//! The machine is pure: it tracks held modifiers and emits [`KeyOutcome`]
//! commands, and the engine executes them. That keeps the
//! starts-equal-finalizations invariant checkable without audio or timers.

use std::collections::HashSet;

use crate::binding::{BindingKind, BindingTable};
use crate::keys::{modifier_of, KeyIdentity, Modifier};

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing { mode_id: String },
}

/// Command emitted for one raw key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Start a session for this mode (the machine is now Capturing).
    Arm {
        mode_id: String,
        wants_selection: bool,
    },
    /// Stop and process the session (the machine is now Idle).
    Finalize { mode_id: String },
    /// Instantaneous pin toggle.
    TogglePin,
    /// Instantaneous speech toggle.
    ToggleSpeech,
    /// Nothing to do.
    Ignored,
}

/// Drives session lifecycle from key-down/key-up events.
#[derive(Debug)]
pub struct CaptureStateMachine {
    table: BindingTable,
    toggle_mode: bool,
    state: CaptureState,
    held_modifiers: HashSet<Modifier>,
}

impl CaptureStateMachine {
    pub fn new(table: BindingTable, toggle_mode: bool) -> Self {
        Self {
            table,
            toggle_mode,
            state: CaptureState::Idle,
            held_modifiers: HashSet::new(),
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, CaptureState::Capturing { .. })
    }

    /// Force back to Idle (error recovery after a failed session start).
    pub fn reset(&mut self) {
        if self.is_capturing() {
            tracing::warn!("Capture state machine reset to Idle");
        }
        self.state = CaptureState::Idle;
    }

    pub fn on_key_down(&mut self, key: rdev::Key) -> KeyOutcome {
        if let Some(modifier) = modifier_of(key) {
            self.held_modifiers.insert(modifier);
        }
        let identity = KeyIdentity::from(key);

        if let CaptureState::Capturing { mode_id } = &self.state {
            // Re-press of the armed binding stops a toggle session; every
            // other key (other bindings, pin/speech toggles) is suppressed.
            if self.toggle_mode && self.armed_binding_matches(mode_id, identity) {
                let mode_id = mode_id.clone();
                self.state = CaptureState::Idle;
                tracing::debug!(mode = %mode_id, "Capture stopped (toggle re-press)");
                return KeyOutcome::Finalize { mode_id };
            }
            return KeyOutcome::Ignored;
        }

        match self.table.lookup(identity, &self.held_modifiers) {
            Some(binding) => match binding.kind {
                BindingKind::Record { wants_selection } => {
                    let mode_id = binding.mode_id.clone();
                    self.state = CaptureState::Capturing {
                        mode_id: mode_id.clone(),
                    };
                    tracing::debug!(mode = %mode_id, key = %identity, "Capture armed");
                    KeyOutcome::Arm {
                        mode_id,
                        wants_selection,
                    }
                }
                BindingKind::TogglePin => KeyOutcome::TogglePin,
                BindingKind::ToggleSpeech => KeyOutcome::ToggleSpeech,
            },
            None => KeyOutcome::Ignored,
        }
    }

    pub fn on_key_up(&mut self, key: rdev::Key) -> KeyOutcome {
        if let Some(modifier) = modifier_of(key) {
            self.held_modifiers.remove(&modifier);
        }
        let identity = KeyIdentity::from(key);

        if let CaptureState::Capturing { mode_id } = &self.state {
            // Hold configurations stop on release of the armed key set;
            // toggle configurations ignore releases entirely.
            if !self.toggle_mode && self.armed_binding_matches(mode_id, identity) {
                let mode_id = mode_id.clone();
                self.state = CaptureState::Idle;
                tracing::debug!(mode = %mode_id, "Capture stopped (key released)");
                return KeyOutcome::Finalize { mode_id };
            }
        }
        KeyOutcome::Ignored
    }

    /// Stop matching is key-set only: the arming modifier may already have
    /// been released by the time the primary key comes up.
    fn armed_binding_matches(&self, mode_id: &str, key: KeyIdentity) -> bool {
        self.table
            .by_mode(mode_id)
            .is_some_and(|b| b.matches_key(key))
    }
}

// =============================================================================
// Tests
// =============================================================================
