//! Ordered delivery of notification rounds.
//!
//! Transitions enqueue their round while holding the state lock, so the queue
//! order is the transition order. The first thread to find the queue idle
//! becomes the deliverer and runs rounds until the queue is empty; everybody
//! else returns at once.
//!
//! ```text
//! push(round) ─► Idle?    ─► Delivering, caller drains
//!             └► Delivering ─► queued, caller returns
//! ```
//!
//! A transition requested from inside a callback lands in the queue and runs
//! on the same thread right after the current round. Nothing ever waits for
//! another round to finish.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Idle,
    Delivering,
}

struct Queue<T> {
    status: Status,
    pending: VecDeque<T>,
}

pub(crate) struct Sequencer<T> {
    queue: Mutex<Queue<T>>,
}

impl<T> Sequencer<T> {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(Queue {
                status: Status::Idle,
                pending: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queue<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues `round`. Returns `true` if the caller must now call [`drain`](Self::drain).
    pub(crate) fn push(&self, round: T) -> bool {
        let mut q = self.lock();
        q.pending.push_back(round);
        match q.status {
            Status::Delivering => false,
            Status::Idle => {
                q.status = Status::Delivering;
                true
            }
        }
    }

    /// Runs queued rounds in FIFO order until none is left, then goes idle.
    pub(crate) fn drain(&self, mut run: impl FnMut(T)) {
        let idle = GoIdle(self);
        loop {
            let next = {
                let mut q = self.lock();
                match q.pending.pop_front() {
                    Some(round) => round,
                    None => {
                        q.status = Status::Idle;
                        drop(q);
                        std::mem::forget(idle);
                        return;
                    }
                }
            };
            run(next);
        }
    }

    /// Rounds waiting for delivery.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.lock().pending.len()
    }
}

/// Releases the deliverer role if a round unwinds; the next push picks up the rest.
struct GoIdle<'a, T>(&'a Sequencer<T>);

impl<T> Drop for GoIdle<'_, T> {
    fn drop(&mut self) {
        self.0.lock().status = Status::Idle;
    }
}
