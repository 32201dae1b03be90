//! Global key listener thread.
//!
//! Wraps `rdev::listen` and feeds every raw press/release into the engine
//! synchronously. `listen` blocks for the life of the process, so this runs
//! on its own dedicated thread; the engine is constructed on that thread
//! because the audio stream it owns must never migrate.

use murmur_core::{MurmurError, Result};

use crate::engine::CaptureEngine;

/// Run the global listener with `engine` until the process exits.
///
/// Fails when the platform refuses the global hook (e.g. no display server
/// or missing input permissions).
pub fn run(mut engine: CaptureEngine) -> Result<()> {
    tracing::info!("Global hotkey listener started");
    rdev::listen(move |event| engine.handle_event(&event))
        .map_err(|e| MurmurError::Capture(format!("global key listener failed: {:?}", e)))
}
