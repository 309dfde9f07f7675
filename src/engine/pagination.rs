use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// "Near the end of the feed" trigger.
///
/// A single armed flag shared between whoever detects proximity (the TUI)
/// and the controller. `try_fire` succeeds at most once per `arm`, so at
/// most one fetch is ever in flight.
#[derive(Debug, Clone, Default)]
pub struct PaginationSignal {
    armed: Arc<AtomicBool>,
}

impl PaginationSignal {
    /// Starts disarmed; the controller arms it after the first batch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Consume the armed state. Returns true only for the caller that
    /// observed it armed.
    pub fn try_fire(&self) -> bool {
        self.armed
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
