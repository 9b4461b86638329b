//! Bounded acquisition of exclusive access to a backend's state.
//!
//! The returned guard is owned so it can be moved into a
//! `spawn_blocking` closure; the state stays locked until the blocking
//! work finishes, even if the awaiting request is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Lock `mutex`, giving up with [`StoreError::Busy`] after `timeout`.
pub(crate) async fn acquire<T>(
    mutex: &Arc<Mutex<T>>,
    timeout: Duration,
) -> StoreResult<OwnedMutexGuard<T>> {
    match tokio::time::timeout(timeout, Arc::clone(mutex).lock_owned()).await {
        Ok(guard) => Ok(guard),
        Err(_) => {
            let waited_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(waited_ms, "timed out waiting for exclusive store access");
            Err(StoreError::Busy { waited_ms })
        }
    }
}
