//! Per-session player result.

use crate::domain::{Decimal, PlayerName};
use serde::{Deserialize, Serialize};

/// One player's participation in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    /// Unique within the session.
    pub name: PlayerName,
    /// Initial buy-in plus all rebuys.
    pub total_buy_in: Decimal,
    /// Chips/cash returned at the end of the session.
    pub cash_out: Decimal,
}

impl PlayerResult {
    pub fn new(name: impl Into<String>, total_buy_in: Decimal, cash_out: Decimal) -> Self {
        Self {
            name: PlayerName::new(name),
            total_buy_in,
            cash_out,
        }
    }

    /// Build from an initial buy-in and a list of rebuys.
    pub fn with_rebuys(
        name: impl Into<String>,
        buy_in: Decimal,
        rebuys: &[Decimal],
        cash_out: Decimal,
    ) -> Self {
        let total_buy_in = buy_in + rebuys.iter().copied().sum::<Decimal>();
        Self::new(name, total_buy_in, cash_out)
    }

    /// `cash_out - total_buy_in`: positive = creditor, negative = debtor.
    pub fn net_result(&self) -> Decimal {
        self.cash_out - self.total_buy_in
    }
}
