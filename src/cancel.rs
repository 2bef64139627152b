//! Cooperative shutdown flag shared with the interrupt handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable flag checked by the role loops between iterations.
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the token was already cancelled.
    pub fn cancel(&self) -> bool {
        self.cancelled.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let handler_side = token.clone();
        assert!(!token.is_cancelled());
        assert!(!handler_side.cancel());
        assert!(token.is_cancelled());
    }

    #[test]
    fn second_cancel_is_reported() {
        let token = CancelToken::new();
        assert!(!token.cancel());
        assert!(token.cancel());
        assert!(token.is_cancelled());
    }
}
