use crate::approval::ApprovalError;
use crate::engine::{PinRejection, ValidationError};
use crate::ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Pinned transfers rejected: {}", format_rejections(.0))]
    PinsRejected(#[from] PinRejection),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Settlement ledger is stale; recompute before using it")]
    Stale,
    #[error("No pinned transfer at index {0}")]
    UnknownPin(usize),
    #[error(transparent)]
    Approval(#[from] ApprovalError),
}

fn format_rejections(rejection: &PinRejection) -> String {
    rejection
        .0
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
