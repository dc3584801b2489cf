use super::{ApprovalError, SessionApprover};
use async_trait::async_trait;

/// Approver that only records the approval in the log.
///
/// Used by the command-line runner, which has no persistence layer to
/// update.
#[derive(Debug, Clone, Default)]
pub struct LoggingApprover;

#[async_trait]
impl SessionApprover for LoggingApprover {
    async fn approve_session(&self, session_id: &str) -> Result<(), ApprovalError> {
        tracing::info!("Session {} marked approved", session_id);
        Ok(())
    }
}
