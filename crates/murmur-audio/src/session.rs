//! Live state of one hotkey-triggered recording session.
//!
//! The session owns the frame buffer and the best-effort preview feed. The
//! driver callback reaches it through a cloneable [`FrameSink`], which keeps
//! the callback O(1), non-blocking, and allocation-light: one frame copy,
//! one decimated slice, and a `try_send` that drops when the overlay lags.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Bounded depth of the preview feed. Visualization is strictly best-effort
/// and must never add backpressure to capture.
pub const PREVIEW_CAPACITY: usize = 5;

/// One active recording session: ordered frame buffer plus preview feed.
///
/// At most one session is active system-wide; the conflict guard lives in
/// the capture service that creates these.
pub struct CaptureSession {
    id: Uuid,
    mode_id: String,
    active: Arc<AtomicBool>,
    frames: Arc<Mutex<Vec<Vec<f32>>>>,
    preview_tx: SyncSender<Vec<f32>>,
    preview_rx: Receiver<Vec<f32>>,
    decimation: usize,
}

impl CaptureSession {
    /// Create an active session for `mode_id`, keeping every
    /// `decimation`-th sample in the preview feed.
    pub fn new(mode_id: impl Into<String>, decimation: usize) -> Self {
        let (preview_tx, preview_rx) = sync_channel(PREVIEW_CAPACITY);
        let session = Self {
            id: Uuid::new_v4(),
            mode_id: mode_id.into(),
            active: Arc::new(AtomicBool::new(true)),
            frames: Arc::new(Mutex::new(Vec::new())),
            preview_tx,
            preview_rx,
            decimation: decimation.max(1),
        };
        tracing::debug!(session_id = %session.id, mode = %session.mode_id, "Capture session armed");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode_id(&self) -> &str {
        &self.mode_id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Handle for the driver callback thread.
    pub fn sink(&self) -> FrameSink {
        FrameSink {
            active: Arc::clone(&self.active),
            frames: Arc::clone(&self.frames),
            preview: self.preview_tx.clone(),
            decimation: self.decimation,
        }
    }

    /// Drain one decimated preview slice, if any is pending.
    pub fn try_preview(&self) -> Option<Vec<f32>> {
        self.preview_rx.try_recv().ok()
    }

    /// Deactivate and concatenate the buffered frames into one array.
    ///
    /// Returns `None` when nothing was captured (the no-result sentinel).
    pub fn finalize(self) -> Option<Vec<f32>> {
        self.active.store(false, Ordering::Relaxed);
        let mut frames = self.frames.lock().expect("frame buffer mutex poisoned");
        if frames.is_empty() {
            tracing::debug!(session_id = %self.id, "Capture session finalized with no audio");
            return None;
        }
        let total: usize = frames.iter().map(Vec::len).sum();
        let mut samples = Vec::with_capacity(total);
        for frame in frames.drain(..) {
            samples.extend_from_slice(&frame);
        }
        tracing::debug!(
            session_id = %self.id,
            samples = samples.len(),
            "Capture session finalized"
        );
        Some(samples)
    }
}

/// Cloneable, thread-safe handle the audio callback appends through.
#[derive(Clone, Debug)]
pub struct FrameSink {
    active: Arc<AtomicBool>,
    frames: Arc<Mutex<Vec<Vec<f32>>>>,
    preview: SyncSender<Vec<f32>>,
    decimation: usize,
}

impl FrameSink {
    /// Append a copy of `frame` and offer a decimated slice to the preview
    /// feed. No-op unless the session is active; full preview queue drops
    /// the slice.
    pub fn push(&self, frame: &[f32]) {
        if !self.active.load(Ordering::Relaxed) {
            return;
        }
        self.frames
            .lock()
            .expect("frame buffer mutex poisoned")
            .push(frame.to_vec());

        let preview: Vec<f32> = frame.iter().step_by(self.decimation).copied().collect();
        let _ = self.preview.try_send(preview);
    }
}

// =============================================================================
// Tests
// =============================================================================
