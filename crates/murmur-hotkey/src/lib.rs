//! Murmur hotkey crate - session lifecycle from global key events.
//!
//! The pure pieces (key identity model, ordered binding table, and the
//! Idle/Capturing state machine) are driven by the [`engine::CaptureEngine`],
//! which starts and stops the audio session and hands finalized audio to the
//! transcription/routing/dispatch pipeline. [`listener::run`] feeds the
//! engine from a dedicated global-listener thread.

pub mod binding;
pub mod engine;
pub mod keys;
pub mod listener;
pub mod machine;

pub use binding::{BindingKind, BindingTable, HotkeyBinding};
pub use engine::{CaptureEngine, PipelineServices};
pub use keys::{KeyIdentity, Modifier};
pub use machine::{CaptureState, CaptureStateMachine, KeyOutcome};
