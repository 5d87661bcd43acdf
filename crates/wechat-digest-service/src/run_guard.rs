use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

use crate::errors::ApiError;

/// Allows at most one ingestion run per process and lets shutdown wait for
/// the active run to finish.
#[derive(Clone, Default)]
pub struct RunGuard {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    running: AtomicBool,
    shutting_down: AtomicBool,
    idle: Notify,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the run slot. The slot is released when the permit is dropped.
    pub fn try_start(&self) -> Result<RunPermit, ApiError> {
        if self.is_shutting_down() {
            return Err(ApiError::ShuttingDown);
        }

        self.inner
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ApiError::IngestionInProgress)?;

        Ok(RunPermit {
            inner: self.inner.clone(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Refuse new runs from now on.
    pub fn start_shutdown(&self) {
        self.inner.shutting_down.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    /// Resolves once no run is active.
    pub async fn idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if !self.is_running() {
                return;
            }
            notified.await;
        }
    }
}

/// Proof of holding the run slot.
#[must_use]
pub struct RunPermit {
    inner: Arc<Inner>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.idle.notify_waiters();
    }
}
