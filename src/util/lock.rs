//! Mutex access that survives poisoning.
//!
//! A panic while holding engine state must not wedge the authoring session, so
//! poisoned guards are recovered and the event is logged.

use std::sync::{Mutex, MutexGuard};

use tracing::warn;

pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    target: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                target_module = target,
                lock_kind = "mutex.lock",
                result = "poisoned_recovered",
                "Recovered from poisoned state lock"
            );
            poisoned.into_inner()
        }
    }
}
