//! Zero-capacity hand-off cell with deadline-bound send and receive.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, MutexGuard, PoisonError,
};
use thiserror::Error;
use tokio::{
    sync::Notify,
    time::{timeout_at, Duration, Instant},
};

/// A send or receive gave up before the other party arrived.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("hand-off timed out after {0:?}")]
pub struct HandoffTimeout(pub Duration);

/// Single-slot rendezvous cell.
///
/// A send parks its value in the slot and completes only once a receiver has
/// taken it out; a receive completes only once a value is present. Each side
/// gives up at its own deadline, and a timed-out sender retracts its value so
/// a later receiver never observes an abandoned hand-off.
///
/// Values are tagged with a ticket so a sender can tell its own parked value
/// apart from a competing sender's when it retracts at the deadline.
pub struct Handoff<T> {
    slot: Mutex<Option<(u64, T)>>,
    tickets: AtomicU64,
    filled: Notify,
    emptied: Notify,
}

impl<T> Handoff<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            tickets: AtomicU64::new(0),
            filled: Notify::new(),
            emptied: Notify::new(),
        }
    }

    /// Hand `value` to a receiver, waiting at most `timeout` for it to be
    /// taken out of the slot.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffTimeout`] when no receiver consumed the value in time;
    /// the value is retracted before the error is returned.
    pub async fn send(&self, value: T, timeout: Duration) -> Result<(), HandoffTimeout> {
        let deadline = Instant::now() + timeout;
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);

        // Park the value once the slot frees up.
        let mut value = value;
        loop {
            let emptied = self.emptied.notified();
            match self.try_park(ticket, value) {
                Ok(()) => break,
                Err(parked_back) => value = parked_back,
            }
            if timeout_at(deadline, emptied).await.is_err() {
                return Err(HandoffTimeout(timeout));
            }
        }
        self.filled.notify_waiters();

        // The hand-off completes once a receiver takes the value back out.
        loop {
            let emptied = self.emptied.notified();
            if !self.holds(ticket) {
                return Ok(());
            }
            if timeout_at(deadline, emptied).await.is_err() {
                if self.retract(ticket) {
                    return Err(HandoffTimeout(timeout));
                }
                // Taken right at the deadline: the hand-off still happened.
                return Ok(());
            }
        }
    }

    /// Take the next value out of the slot, waiting at most `timeout` for a
    /// sender to park one.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffTimeout`] when no value arrived in time.
    pub async fn recv(&self, timeout: Duration) -> Result<T, HandoffTimeout> {
        let deadline = Instant::now() + timeout;
        loop {
            let filled = self.filled.notified();
            if let Some(value) = self.take() {
                return Ok(value);
            }
            if timeout_at(deadline, filled).await.is_err() {
                return Err(HandoffTimeout(timeout));
            }
        }
    }

    fn try_park(&self, ticket: u64, value: T) -> Result<(), T> {
        let mut slot = lock(&self.slot);
        if slot.is_some() {
            return Err(value);
        }
        *slot = Some((ticket, value));
        Ok(())
    }

    fn take(&self) -> Option<T> {
        let taken = lock(&self.slot).take().map(|(_, value)| value);
        if taken.is_some() {
            self.emptied.notify_waiters();
        }
        taken
    }

    fn holds(&self, ticket: u64) -> bool {
        matches!(&*lock(&self.slot), Some((parked, _)) if *parked == ticket)
    }

    /// Remove our own value after a timed-out send. Returns `false` when a
    /// receiver (or nobody, for a value already taken) got there first.
    fn retract(&self, ticket: u64) -> bool {
        let mut slot = lock(&self.slot);
        let ours = matches!(&*slot, Some((parked, _)) if *parked == ticket);
        if ours {
            *slot = None;
            drop(slot);
            self.emptied.notify_waiters();
        }
        ours
    }
}

impl<T> Default for Handoff<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
