//! Mutex helpers.

use std::sync::{Mutex, MutexGuard};

/// Helper trait to recover from poisoned mutexes.
///
/// Everything guarded in this crate changes by single assignment, insert,
/// or remove, so the data behind a poisoned lock is still consistent.
pub(crate) trait RecoverMutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T>;
}

impl<T> RecoverMutex<T> for Mutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Mutex was poisoned, recovering data");
            poisoned.into_inner()
        })
    }
}
