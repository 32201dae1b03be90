//! Murmur bridge crate - marshaling between worker threads and the UI actor.
//!
//! The application owns all mutable state on a single cooperative UI loop.
//! Worker threads never touch that state directly; they enqueue closures via
//! [`UiHandle::schedule`], and the loop executes them strictly in enqueue
//! order, one at a time. [`spawn`] launches a short-lived, fire-and-forget
//! background thread for one network-bound operation, and [`guarded`] is the
//! uniform error wrapper composed around every external call: failures are
//! logged and degrade to `None`, never propagated into the loop.

use std::fmt::Display;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;

/// A unit of work scheduled onto the UI actor.
type Job<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Cloneable handle for enqueueing work onto the UI actor.
pub struct UiHandle<S> {
    tx: Sender<Job<S>>,
}

impl<S> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> UiHandle<S> {
    /// Enqueue a callback to run on the UI actor.
    ///
    /// Callbacks run in enqueue order and never concurrently with each
    /// other. If the loop has shut down the job is dropped with a log line;
    /// a late worker result has nowhere left to go.
    pub fn schedule(&self, job: impl FnOnce(&mut S) + Send + 'static) {
        if self.tx.send(Box::new(job)).is_err() {
            tracing::warn!("UI actor is gone; dropping scheduled callback");
        }
    }
}

/// The single UI-owning actor: owns the shared state and drains the queue.
pub struct UiLoop<S> {
    rx: Receiver<Job<S>>,
    state: S,
}

/// Create the UI actor for `state`, returning a scheduling handle and the
/// loop that owns the state.
pub fn ui_actor<S>(state: S) -> (UiHandle<S>, UiLoop<S>) {
    let (tx, rx) = channel();
    (UiHandle { tx }, UiLoop { rx, state })
}

impl<S> UiLoop<S> {
    /// Run until every [`UiHandle`] has been dropped, executing jobs in
    /// enqueue order. The loop must never block on anything but the queue.
    pub fn run(&mut self) {
        while let Ok(job) = self.rx.recv() {
            job(&mut self.state);
        }
        tracing::info!("UI actor shut down");
    }

    /// Execute everything currently queued without blocking. Returns the
    /// number of jobs run. Used by tests and by embedders that drive the
    /// loop from an existing event cycle.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job(&mut self.state);
            ran += 1;
        }
        ran
    }

    /// Immutable view of the owned state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable view of the owned state (UI-loop context only).
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

/// Launch a named, fire-and-forget worker thread for one blocking operation.
///
/// The worker must route any result back through [`UiHandle::schedule`].
/// Returns the join handle so tests can await completion; production callers
/// drop it.
pub fn spawn(name: &str, f: impl FnOnce() + Send + 'static) -> Option<JoinHandle<()>> {
    match std::thread::Builder::new().name(name.to_string()).spawn(f) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(worker = name, error = %e, "Failed to spawn worker thread");
            None
        }
    }
}

/// Run a fallible external call under the uniform failure policy: log the
/// error with the operation name and degrade to `None`.
pub fn guarded<T, E: Display>(operation: &str, f: impl FnOnce() -> Result<T, E>) -> Option<T> {
    match f() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(operation, error = %e, "External call failed; dropping result");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
