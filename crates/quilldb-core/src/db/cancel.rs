use crate::error::{ErrorOrigin, InternalError};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

///
/// CancellationSignal
///
/// Cooperative cancellation polled by long-running phases. Raising the
/// signal never interrupts work; it is observed at the next check.
///

pub trait CancellationSignal {
    fn is_cancelled(&self) -> bool;

    /// Fail with a cancellation error once the signal is raised.
    fn check(&self, origin: ErrorOrigin) -> Result<(), InternalError> {
        if self.is_cancelled() {
            return Err(InternalError::cancelled(origin));
        }

        Ok(())
    }
}

///
/// NeverCancelled
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancelled;

impl CancellationSignal for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

///
/// CancellationToken
///
/// Shared flag; clones observe the same signal.
///

#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl CancellationSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
