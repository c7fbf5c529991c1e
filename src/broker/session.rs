//! Per-principal login session and its rendezvous protocol.

use super::{
    handoff::{Handoff, HandoffTimeout},
    phase::Phase,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::{Duration, Instant};

struct Inner {
    phase: Phase,
    slide_url: String,
    phone_number: String,
    verify_url: String,
    last_updated: Instant,
}

/// One in-flight login attempt.
///
/// Only the worker writes the phase and challenge data; external callers read
/// [`Session::snapshot`]. The two hand-off cells are the sole synchronization
/// between the worker and the callers: `request` carries answers from the
/// external side to the worker, `response` carries a unit pulse back meaning
/// "state changed, current result available".
///
/// Challenge fields are meaningful only for the phase that produced them and
/// are never cleared; callers correlate by phase.
pub struct Session {
    inner: Mutex<Inner>,
    request: Handoff<String>,
    response: Handoff<()>,
}

/// Immutable copy of a session's reportable state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub phase: Phase,
    pub slide_url: String,
    pub phone_number: String,
    pub verify_url: String,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                phase: Phase::Init,
                slide_url: String::new(),
                phone_number: String::new(),
                verify_url: String::new(),
                last_updated: Instant::now(),
            }),
            request: Handoff::new(),
            response: Handoff::new(),
        }
    }

    /// Set the phase and refresh the idle clock. This is the only operation
    /// that refreshes `last_updated`.
    pub fn set_phase(&self, phase: Phase) {
        let mut inner = self.lock();
        inner.phase = phase;
        inner.last_updated = Instant::now();
    }

    pub fn set_slide_url(&self, url: impl Into<String>) {
        self.lock().slide_url = url.into();
    }

    pub fn set_phone_number(&self, phone_number: impl Into<String>) {
        self.lock().phone_number = phone_number.into();
    }

    pub fn set_verify_url(&self, url: impl Into<String>) {
        self.lock().verify_url = url.into();
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Time since the last phase transition; the sweeper's only input.
    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.lock().last_updated.elapsed()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            phase: inner.phase,
            slide_url: inner.slide_url.clone(),
            phone_number: inner.phone_number.clone(),
            verify_url: inner.verify_url.clone(),
        }
    }

    /// Caller side: hand a user-entered answer to the waiting worker.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffTimeout`] when no worker consumed the answer in time;
    /// the caller may retry once the worker has caught up.
    pub async fn send_request(
        &self,
        answer: String,
        timeout: Duration,
    ) -> Result<(), HandoffTimeout> {
        self.request.send(answer, timeout).await
    }

    /// Worker side: block until the caller supplies the next answer.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffTimeout`] when no answer arrived in time; the worker
    /// must treat this as abandonment of the attempt.
    pub async fn await_request(&self, timeout: Duration) -> Result<String, HandoffTimeout> {
        self.request.recv(timeout).await
    }

    /// Worker side: signal the caller that the state changed.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffTimeout`] when no caller picked the signal up in time.
    pub async fn send_response(&self, timeout: Duration) -> Result<(), HandoffTimeout> {
        self.response.send((), timeout).await
    }

    /// Caller side: block until the worker signals the next state change.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffTimeout`] when the worker is still busy; the attempt
    /// itself is unaffected and the caller should poll again.
    pub async fn await_response(&self, timeout: Duration) -> Result<(), HandoffTimeout> {
        self.response.recv(timeout).await
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
