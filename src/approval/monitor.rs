//! Edge-triggered auto-approval.

use super::{on_payment_change, ApprovalError, SessionApprover, SessionStatus};
use crate::ledger::Ledger;
use crate::session::SessionSettlementState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the monitor did with the approver on one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    /// Status is not `completed`; nothing to approve.
    None,
    /// The approver was called and succeeded.
    Fired,
    /// Already approved for the current completed streak.
    AlreadyApproved,
    /// Another approval call is outstanding; this observation was ignored.
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub status: SessionStatus,
    pub action: ApprovalAction,
}

#[derive(Debug, Default)]
struct MonitorState {
    last_status: Option<SessionStatus>,
    approved: bool,
    /// Bumped on every non-completed observation.
    rearms: u64,
}

/// Calls the injected approver once per transition into `completed`.
///
/// Leaving `completed` (a transfer unmarked, or the ledger going stale)
/// re-arms the monitor, including while an approval call is outstanding.
/// A failed approval is not recorded, so the next observation retries it.
/// At most one approval call is in flight per monitor.
#[derive(Debug)]
pub struct ApprovalMonitor {
    session_id: String,
    approver: Arc<dyn SessionApprover>,
    state: Mutex<MonitorState>,
    in_flight: AtomicBool,
}

impl ApprovalMonitor {
    pub fn new(session_id: impl Into<String>, approver: Arc<dyn SessionApprover>) -> Self {
        Self {
            session_id: session_id.into(),
            approver,
            state: Mutex::new(MonitorState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether the approver has succeeded for the current completed streak.
    pub async fn is_approved(&self) -> bool {
        self.state.lock().await.approved
    }

    pub async fn last_status(&self) -> Option<SessionStatus> {
        self.state.lock().await.last_status
    }

    /// Observe the ledger after a payment-state change.
    ///
    /// The ledger is only read; paid flags are never modified here.
    ///
    /// # Errors
    /// Returns the approver's error unchanged; the caller decides whether to
    /// retry by observing again.
    pub async fn observe(&self, ledger: &Ledger) -> Result<ApprovalOutcome, ApprovalError> {
        self.observe_status(on_payment_change(ledger)).await
    }

    /// Observe a session's settlement state. A stale ledger reads as
    /// `pending`, so recomputing back into `completed` is a new edge.
    pub async fn observe_state(
        &self,
        state: &SessionSettlementState,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        self.observe_status(state.status()).await
    }

    pub async fn observe_status(
        &self,
        status: SessionStatus,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        if status != SessionStatus::Completed {
            let mut state = self.state.lock().await;
            if state.approved {
                tracing::info!(
                    "Session {} left completed ({}); approval re-armed",
                    self.session_id,
                    status
                );
            }
            state.approved = false;
            state.last_status = Some(status);
            state.rearms = state.rearms.wrapping_add(1);
            return Ok(ApprovalOutcome {
                status,
                action: ApprovalAction::None,
            });
        }

        if self.state.lock().await.approved {
            return Ok(ApprovalOutcome {
                status,
                action: ApprovalAction::AlreadyApproved,
            });
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(
                "Approval for session {} already in flight; ignoring",
                self.session_id
            );
            return Ok(ApprovalOutcome {
                status,
                action: ApprovalAction::InFlight,
            });
        }

        // A call that finished between the check above and the claim.
        let rearms = {
            let state = self.state.lock().await;
            if state.approved {
                self.in_flight.store(false, Ordering::Release);
                return Ok(ApprovalOutcome {
                    status,
                    action: ApprovalAction::AlreadyApproved,
                });
            }
            state.rearms
        };

        tracing::info!("Session {} completed; requesting approval", self.session_id);
        let result = self.approver.approve_session(&self.session_id).await;

        let mut state = self.state.lock().await;
        self.in_flight.store(false, Ordering::Release);
        match result {
            Ok(()) => {
                if state.rearms == rearms {
                    state.approved = true;
                    state.last_status = Some(status);
                    tracing::info!("Session {} approved", self.session_id);
                } else {
                    // Left completed while the call was out; stay armed.
                    tracing::info!(
                        "Session {} approved, but left completed meanwhile; approval re-armed",
                        self.session_id
                    );
                }
                Ok(ApprovalOutcome {
                    status,
                    action: ApprovalAction::Fired,
                })
            }
            Err(err) => {
                tracing::warn!("Approval for session {} failed: {}", self.session_id, err);
                Err(err)
            }
        }
    }
}
