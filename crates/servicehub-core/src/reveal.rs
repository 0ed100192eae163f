// "Load more" for capped lists
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// How much of a list is showing, and how it grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealState {
    revealed: usize,
    total: usize,
    initial: usize,
    batch: usize,
}

impl RevealState {
    pub fn new(initial: usize, batch: usize, total: usize) -> Self {
        Self {
            revealed: initial.min(total),
            total,
            initial,
            batch,
        }
    }

    /// Reveal one more batch, never past `total`
    ///
    /// Once everything is showing this does nothing.
    pub fn grow(&mut self) -> usize {
        self.revealed = self.revealed.saturating_add(self.batch).min(self.total);
        self.revealed
    }

    /// Start over on a list of a new size
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.revealed = self.initial.min(total);
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.revealed < self.total
    }

    /// The revealed prefix of `items`
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.revealed.min(items.len())]
    }
}

/// What happened to a `grow` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowOutcome {
    /// New revealed count
    Grew(usize),
    /// Everything is already showing
    Exhausted,
    /// Another growth was still loading, this one was dropped
    Busy,
}

/// Reveal state plus the fake loading pause
///
/// At most one growth is in flight per controller. A `grow` arriving while
/// one is loading gets `Busy` back and is not queued.
#[derive(Debug)]
pub struct RevealController {
    state: Mutex<RevealState>,
    loading: AtomicBool,
    delay: Duration,
}

/// Clears the loading flag even if the growing future gets dropped mid-sleep
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RevealController {
    pub fn new(state: RevealState, delay: Duration) -> Self {
        Self {
            state: Mutex::new(state),
            loading: AtomicBool::new(false),
            delay,
        }
    }

    pub async fn grow(&self) -> GrowOutcome {
        if !self.lock().has_more() {
            return GrowOutcome::Exhausted;
        }

        if self.loading.swap(true, Ordering::AcqRel) {
            debug!("Reveal already loading, dropping grow request");
            return GrowOutcome::Busy;
        }
        let _guard = LoadingGuard(&self.loading);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let revealed = self.lock().grow();
        GrowOutcome::Grew(revealed)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> RevealState {
        *self.lock()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn reset(&self, total: usize) {
        self.lock().reset(total);
    }

    // Never held across an await, so a poisoned lock only means a panicking test
    fn lock(&self) -> MutexGuard<'_, RevealState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
