//! Mock approver for testing without a persistence layer.

use super::{ApprovalError, SessionApprover};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Records every approval request and can be scripted to fail or stall.
#[derive(Debug, Default)]
pub struct MockApprover {
    calls: Mutex<Vec<String>>,
    failures_remaining: AtomicUsize,
    delay: Option<Duration>,
}

impl MockApprover {
    /// Create an approver that always succeeds immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` calls with `ApprovalError::Unavailable`.
    pub fn failing_times(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Sleep for `delay` inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Session ids passed to `approve_session`, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl SessionApprover for MockApprover {
    async fn approve_session(&self, session_id: &str) -> Result<(), ApprovalError> {
        self.calls.lock().await.push(session_id.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(ApprovalError::Unavailable(format!(
                "mock failure for session {}",
                session_id
            )));
        }
        Ok(())
    }
}
