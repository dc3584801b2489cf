pub mod approval;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod session;

pub use approval::{
    on_payment_change, ApprovalAction, ApprovalError, ApprovalMonitor, ApprovalOutcome,
    LoggingApprover, MockApprover, SessionApprover, SessionStatus,
};
pub use config::{Config, EngineConfig, MatchOrder};
pub use domain::{
    Decimal, PinnedTransfer, PlayerName, PlayerResult, Transfer, TransferId, TransferLeg,
    TransferOrigin,
};
pub use engine::{
    apply_pinned, compute_balances, optimize, Balance, Balances, Optimization, PinRejection,
    ValidationError,
};
pub use error::SettlementError;
pub use ledger::{build_ledger, Ledger, LedgerError};
pub use session::{RecomputeReport, SessionSettlementState, SettlementSession};
