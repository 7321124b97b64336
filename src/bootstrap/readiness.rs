//! Stack readiness flag
//!
//! Set once by the stack's enable-completion path and polled by the
//! bootstrap sequence. Both sides may run in different contexts, so the
//! flag and the completion code are atomics.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::bootstrap::traits::StackError;

/// Enable completion flag, shared by reference between the host and bootstrap
pub struct Readiness {
    ready: AtomicBool,
    code: AtomicI32,
}

impl Readiness {
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            code: AtomicI32::new(0),
        }
    }

    /// Enable-completion callback.
    ///
    /// Marks the stack ready whether or not enabling succeeded; a failure
    /// is only logged and kept for [`Readiness::result`]. Later completions
    /// are ignored.
    pub fn complete(&self, result: Result<(), StackError>) {
        if self.is_ready() {
            log::warn!("bt enable completed twice, ignoring");
            return;
        }

        if let Err(error) = result {
            log::error!("bt enable return {}", error.code());
            self.code.store(error.code(), Ordering::Relaxed);
        }
        log::info!("bt ready!");
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Outcome reported by the completion, `Ok` until one arrives
    pub fn result(&self) -> Result<(), StackError> {
        if !self.is_ready() {
            return Ok(());
        }

        match self.code.load(Ordering::Relaxed) {
            0 => Ok(()),
            code => Err(StackError::EnableFailed(code)),
        }
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_not_ready() {
        let readiness = Readiness::new();
        assert!(!readiness.is_ready());
        assert_eq!(readiness.result(), Ok(()));
    }

    #[test]
    fn test_ready_after_success() {
        let readiness = Readiness::new();
        readiness.complete(Ok(()));

        assert!(readiness.is_ready());
        assert_eq!(readiness.result(), Ok(()));
    }

    #[test]
    fn test_ready_even_after_failure() {
        let readiness = Readiness::new();
        readiness.complete(Err(StackError::EnableFailed(-19)));

        assert!(readiness.is_ready());
        assert_eq!(readiness.result(), Err(StackError::EnableFailed(-19)));
    }

    #[test]
    fn test_first_completion_wins() {
        let readiness = Readiness::new();
        readiness.complete(Ok(()));
        readiness.complete(Err(StackError::Host));

        assert_eq!(readiness.result(), Ok(()));
    }

    #[test]
    fn test_host_error_keeps_code() {
        let readiness = Readiness::new();
        readiness.complete(Err(StackError::Host));

        assert_eq!(readiness.result(), Err(StackError::EnableFailed(-5)));
    }
}
