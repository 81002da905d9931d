//! Cooperative cancellation of a planning call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag the host can raise to abandon a planning call.
///
/// The planner checks the flag at the top of every spiral step and every
/// relocation search wave, then returns whatever partial plan exists. Clones
/// share the same flag, so one copy can be handed to the planning thread and
/// another kept to cancel from outside.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
