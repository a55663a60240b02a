//! Bounded wait on a one-shot completion
//!
//! A [`Completion`] is handed to the worker doing the asynchronous part of a
//! flush; the matching [`CompletionWaiter`] blocks the calling thread until the
//! worker completes, the worker goes away, or the timeout elapses. On timeout
//! the worker is left running and whatever it produces later is dropped.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

enum State<T> {
    Pending,
    Done(T),
    Abandoned,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Result of a bounded wait
#[derive(Debug, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The worker completed within the deadline
    Completed(T),
    /// The worker was dropped without completing (e.g. it panicked)
    Abandoned,
    /// The deadline elapsed first
    TimedOut,
}

/// Completing side of the pair
pub struct Completion<T> {
    shared: Arc<Shared<T>>,
}

/// Waiting side of the pair
pub struct CompletionWaiter<T> {
    shared: Arc<Shared<T>>,
}

/// Creates a connected completion/waiter pair
pub fn completion<T>() -> (Completion<T>, CompletionWaiter<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State::Pending),
        ready: Condvar::new(),
    });
    (
        Completion {
            shared: Arc::clone(&shared),
        },
        CompletionWaiter { shared },
    )
}

impl<T> Completion<T> {
    /// Stores the result and wakes the waiter, if it is still waiting
    pub fn complete(self, value: T) {
        *self.shared.lock() = State::Done(value);
        self.shared.ready.notify_all();
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        if matches!(*state, State::Pending) {
            *state = State::Abandoned;
            drop(state);
            self.shared.ready.notify_all();
        }
    }
}

impl<T> CompletionWaiter<T> {
    /// Blocks until the completion fires or `timeout` elapses
    pub fn wait(self, timeout: Duration) -> WaitOutcome<T> {
        let guard = self.shared.lock();
        let (mut state, _) = self
            .shared
            .ready
            .wait_timeout_while(guard, timeout, |state| matches!(state, State::Pending))
            .unwrap_or_else(PoisonError::into_inner);

        match std::mem::replace(&mut *state, State::Abandoned) {
            State::Done(value) => WaitOutcome::Completed(value),
            State::Abandoned => WaitOutcome::Abandoned,
            State::Pending => {
                // Keep the slot pending so a late completion is simply discarded.
                *state = State::Pending;
                WaitOutcome::TimedOut
            }
        }
    }
}
