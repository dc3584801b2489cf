//! Session status signalling and the external "approve session" seam.

use crate::ledger::Ledger;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod logging;
pub mod mock;
pub mod monitor;

pub use logging::LoggingApprover;
pub use mock::MockApprover;
pub use monitor::{ApprovalAction, ApprovalMonitor, ApprovalOutcome};

/// Settlement status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No transfer paid yet, or no trustworthy ledger.
    Pending,
    /// Some but not all transfers paid.
    Partial,
    /// Every transfer paid, or nothing to pay.
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Partial => write!(f, "partial"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Status signal for a ledger's current payment state.
///
/// An empty ledger is `Completed`: a session with no net movement approves
/// immediately.
pub fn on_payment_change(ledger: &Ledger) -> SessionStatus {
    if ledger.is_complete() {
        SessionStatus::Completed
    } else if ledger.paid_count() > 0 {
        SessionStatus::Partial
    } else {
        SessionStatus::Pending
    }
}

/// The persistence/API operation that marks a session approved.
///
/// Implementations own their own timeouts; the monitor awaits one call at a
/// time per session.
#[async_trait]
pub trait SessionApprover: Send + Sync + fmt::Debug {
    async fn approve_session(&self, session_id: &str) -> Result<(), ApprovalError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    /// The external system refused the approval.
    #[error("approval rejected: {0}")]
    Rejected(String),
    /// The external system could not be reached; safe to retry.
    #[error("approver unavailable: {0}")]
    Unavailable(String),
    #[error("approval failed: {0}")]
    Other(String),
}
