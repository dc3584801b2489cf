//! Transfer legs and ledger entries.

use crate::domain::{Decimal, PlayerName, TransferId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directed money movement: `from` pays `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLeg {
    pub from: PlayerName,
    pub to: PlayerName,
    pub amount: Decimal,
}

impl TransferLeg {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Decimal) -> Self {
        Self {
            from: PlayerName::new(from),
            to: PlayerName::new(to),
            amount,
        }
    }
}

/// A transfer the operator forces ahead of optimization.
pub type PinnedTransfer = TransferLeg;

/// Where a ledger entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferOrigin {
    /// Pinned by the operator.
    Manual,
    /// Produced by the settlement optimizer.
    Optimized,
}

impl std::fmt::Display for TransferOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferOrigin::Manual => write!(f, "manual"),
            TransferOrigin::Optimized => write!(f, "optimized"),
        }
    }
}

/// One settlement instruction in a session ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: TransferId,
    pub from: PlayerName,
    pub to: PlayerName,
    /// Rounded to currency precision.
    pub amount: Decimal,
    pub origin: TransferOrigin,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    /// The `(from, to, amount, origin)` identity of this entry, ignoring
    /// id, paid state and creation time.
    pub fn settlement_key(&self) -> (&PlayerName, &PlayerName, Decimal, TransferOrigin) {
        (&self.from, &self.to, self.amount, self.origin)
    }
}
