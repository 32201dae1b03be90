//! Microphone-backed capture service.
//!
//! Opens a mono f32 cpal input stream at the configured rate and feeds the
//! session's [`FrameSink`] from the driver callback thread. `start`/`stop`
//! are only ever called from the hotkey listener's execution context, so the
//! service itself needs no internal locking; the cpal stream is created and
//! dropped on that same thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use murmur_core::{MurmurError, Result};

use crate::session::{CaptureSession, FrameSink};
use crate::CaptureControl;

/// Owns at most one recording session and its input stream.
pub struct CaptureService {
    sample_rate: u32,
    decimation: usize,
    session: Option<CaptureSession>,
    stream: Option<cpal::Stream>,
}

impl CaptureService {
    pub fn new(sample_rate: u32, decimation: usize) -> Self {
        Self {
            sample_rate,
            decimation,
            session: None,
            stream: None,
        }
    }

    /// Reject a new session while one is active, otherwise arm one.
    ///
    /// The conflict guard rejects rather than queues: a start that races an
    /// active session is dropped with a log line.
    fn arm_session(&mut self, mode_id: &str) -> Result<FrameSink> {
        if self.session.as_ref().is_some_and(CaptureSession::is_active) {
            return Err(MurmurError::Capture(format!(
                "capture already active; rejecting start for mode '{}'",
                mode_id
            )));
        }
        let session = CaptureSession::new(mode_id, self.decimation);
        let sink = session.sink();
        self.session = Some(session);
        Ok(sink)
    }

    fn open_stream(&mut self, sink: FrameSink) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| MurmurError::Audio("no default input device".to_string()))?;
        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| sink.push(data),
                |err| tracing::warn!(error = %err, "Audio input stream error"),
                None,
            )
            .map_err(|e| MurmurError::Audio(format!("failed to open input stream: {}", e)))?;
        stream
            .play()
            .map_err(|e| MurmurError::Audio(format!("failed to start input stream: {}", e)))?;

        self.stream = Some(stream);
        Ok(())
    }
}

impl CaptureControl for CaptureService {
    fn start(&mut self, mode_id: &str) -> Result<()> {
        let sink = self.arm_session(mode_id)?;
        if let Err(e) = self.open_stream(sink) {
            // Leave no half-armed session behind.
            self.session = None;
            return Err(e);
        }
        tracing::info!(mode = mode_id, sample_rate = self.sample_rate, "Recording started");
        Ok(())
    }

    fn stop(&mut self) -> Option<Vec<f32>> {
        if let Some(stream) = self.stream.take() {
            drop(stream);
        }
        let samples = self.session.take().and_then(CaptureSession::finalize);
        tracing::info!(
            samples = samples.as_ref().map_or(0, Vec::len),
            "Recording stopped"
        );
        samples
    }

    fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(CaptureSession::is_active)
    }

    fn try_preview(&self) -> Option<Vec<f32>> {
        self.session.as_ref().and_then(CaptureSession::try_preview)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Stream-opening paths need real hardware; the session logic is covered
    // without it.

    #[test]
    fn test_stop_without_session_returns_none() {
        let mut service = CaptureService::new(44_100, 10);
        assert!(service.stop().is_none());
        assert!(!service.is_active());
    }

    #[test]
    fn test_arm_session_conflict_rejected() {
        let mut service = CaptureService::new(44_100, 10);
        service.arm_session("dictation").unwrap();
        let second = service.arm_session("assistant");
        assert!(second.is_err());
        assert!(second
            .unwrap_err()
            .to_string()
            .contains("capture already active"));
        // The original session is untouched.
        assert_eq!(service.session.as_ref().unwrap().mode_id(), "dictation");
    }

    #[test]
    fn test_arm_after_stop_is_allowed() {
        let mut service = CaptureService::new(44_100, 10);
        service.arm_session("dictation").unwrap();
        service.stop();
        assert!(service.arm_session("assistant").is_ok());
    }

    #[test]
    fn test_armed_session_collects_sink_frames() {
        let mut service = CaptureService::new(44_100, 10);
        service.arm_session("dictation").unwrap();
        let sink = service.session.as_ref().unwrap().sink();
        sink.push(&[0.1, 0.2]);
        sink.push(&[0.3]);
        assert_eq!(service.stop().unwrap(), vec![0.1, 0.2, 0.3]);
    }
}
