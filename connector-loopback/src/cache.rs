//! Reader history caches and the notifier `wait` blocks on.

use crate::config::History;
use connector_core::Timeout;
use parking_lot::{Condvar, Mutex};
use serde_json::Value;
use std::{collections::VecDeque, sync::Arc};

/// A delivered sample.
#[derive(Debug, Clone)]
pub(crate) struct Sample {
    pub data: Value,
    pub valid_data: bool,
}

#[derive(Debug)]
struct Cached {
    sample: Sample,
    read: bool,
}

#[derive(Debug, Default)]
struct CacheState {
    history: VecDeque<Cached>,
    /// Samples loaded by the last `read` or `take`.
    loaned: Vec<Sample>,
}

/// History cache of one reader.
#[derive(Debug)]
pub(crate) struct ReaderCache {
    history: History,
    state: Mutex<CacheState>,
    notifier: Arc<Notifier>,
}

impl ReaderCache {
    pub fn new(history: History, notifier: Arc<Notifier>) -> Self {
        ReaderCache {
            history,
            state: Mutex::new(CacheState::default()),
            notifier,
        }
    }

    /// Store a sample, evicting the oldest one when a keep-last history is full.
    pub fn push(&self, sample: Sample) {
        {
            let mut state = self.state.lock();
            if let History::KeepLast(depth) = self.history {
                while state.history.len() >= depth.max(1) {
                    state.history.pop_front();
                }
            }
            state.history.push_back(Cached {
                sample,
                read: false,
            });
        }
        self.notifier.notify();
    }

    pub fn read(&self) {
        let mut state = self.state.lock();
        let loaned = state
            .history
            .iter_mut()
            .map(|cached| {
                cached.read = true;
                cached.sample.clone()
            })
            .collect();
        state.loaned = loaned;
    }

    pub fn take(&self) {
        let mut state = self.state.lock();
        let loaned = state.history.drain(..).map(|cached| cached.sample).collect();
        state.loaned = loaned;
    }

    pub fn loaned_len(&self) -> usize {
        self.state.lock().loaned.len()
    }

    /// Run `f` on a loaned sample, or return `None` if `index` is out of range.
    pub fn with_loaned<R>(&self, index: usize, f: impl FnOnce(&Sample) -> R) -> Option<R> {
        let state = self.state.lock();
        state.loaned.get(index).map(f)
    }

    pub fn has_unread(&self) -> bool {
        self.state.lock().history.iter().any(|cached| !cached.read)
    }
}

/// Wakes the `wait` calls of one session.
///
/// Deliveries bump a generation counter under the lock, so a waiter that
/// checked its condition while holding the lock cannot miss the wakeup.
#[derive(Debug, Default)]
pub(crate) struct Notifier {
    generation: Mutex<u64>,
    cond: Condvar,
}

impl Notifier {
    pub fn notify(&self) {
        let mut generation = self.generation.lock();
        *generation = generation.wrapping_add(1);
        self.cond.notify_all();
    }

    /// Block until `ready` returns `true` or `timeout` elapses.
    ///
    /// Returns the final value of `ready`.
    pub fn wait_until(&self, timeout: Timeout, ready: impl Fn() -> bool) -> bool {
        let deadline = timeout.deadline();
        let mut generation = self.generation.lock();
        loop {
            if ready() {
                return true;
            }
            match deadline {
                None => self.cond.wait(&mut generation),
                Some(deadline) => {
                    if self.cond.wait_until(&mut generation, deadline).timed_out() {
                        return ready();
                    }
                }
            }
        }
    }
}
