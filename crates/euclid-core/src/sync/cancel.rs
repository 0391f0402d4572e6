use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cycle-scoped cancellation signal.
///
/// Cloned handles share one flag. Cancelling stops a cycle before its next
/// component starts; work already in flight for a component runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
