//! Greedy creditor/debtor matching.

use super::balances::{Balance, Balances};
use crate::config::{EngineConfig, MatchOrder};
use crate::domain::{Decimal, PlayerName, TransferLeg};

/// Optimizer output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Optimization {
    /// Debtor -> creditor legs, in emission order.
    pub transfers: Vec<TransferLeg>,
    /// Residual positions nobody could be matched against. Non-empty when
    /// the input balances do not sum to zero, or when currency rounding
    /// leaves a remainder larger than epsilon.
    pub unsettled: Vec<Balance>,
}

impl Optimization {
    pub fn is_balanced(&self) -> bool {
        self.unsettled.is_empty()
    }
}

#[derive(Debug)]
struct Position<'a> {
    name: &'a PlayerName,
    magnitude: Decimal,
}

/// Compute a short list of transfers that zeroes every residual balance.
///
/// Players with `balance > epsilon` are creditors, `balance < -epsilon`
/// debtors. The head creditor and head debtor settle `min` of their
/// magnitudes until one side runs out. Every step retires at least one
/// party, so at most `creditors + debtors - 1` transfers are emitted.
pub fn optimize(residual: &Balances, config: &EngineConfig) -> Optimization {
    let epsilon = config.epsilon;
    let mut creditors: Vec<Position> = residual
        .iter()
        .filter(|b| b.amount.exceeds(epsilon))
        .map(|b| Position {
            name: &b.name,
            magnitude: b.amount,
        })
        .collect();
    let mut debtors: Vec<Position> = residual
        .iter()
        .filter(|b| (-b.amount).exceeds(epsilon))
        .map(|b| Position {
            name: &b.name,
            magnitude: b.amount.abs(),
        })
        .collect();

    if config.match_order == MatchOrder::Magnitude {
        // Stable: equal magnitudes keep insertion order.
        creditors.sort_by(|a, b| b.magnitude.cmp(&a.magnitude));
        debtors.sort_by(|a, b| b.magnitude.cmp(&a.magnitude));
    }

    let mut transfers = Vec::new();
    let mut retired: Vec<Balance> = Vec::new();
    let (mut ci, mut di) = (0, 0);

    while ci < creditors.len() && di < debtors.len() {
        let creditor = &creditors[ci];
        let debtor = &debtors[di];
        let amount = creditor
            .magnitude
            .min(debtor.magnitude)
            .round_currency(config.currency_scale);

        if amount.is_positive() {
            transfers.push(TransferLeg {
                from: debtor.name.clone(),
                to: creditor.name.clone(),
                amount,
            });
            tracing::debug!("Matched {} -> {} {}", debtor.name, creditor.name, amount);
        }

        creditors[ci].magnitude -= amount;
        debtors[di].magnitude -= amount;

        let creditor_done = creditors[ci].magnitude <= epsilon;
        let debtor_done = debtors[di].magnitude <= epsilon;
        if !creditor_done && !debtor_done {
            // Rounding left both sides open; retire the smaller one as unsettled.
            if creditors[ci].magnitude <= debtors[di].magnitude {
                retired.push(Balance {
                    name: creditors[ci].name.clone(),
                    amount: creditors[ci].magnitude,
                });
                ci += 1;
            } else {
                retired.push(Balance {
                    name: debtors[di].name.clone(),
                    amount: -debtors[di].magnitude,
                });
                di += 1;
            }
            continue;
        }
        if creditor_done {
            ci += 1;
        }
        if debtor_done {
            di += 1;
        }
    }

    let unsettled: Vec<Balance> = retired
        .into_iter()
        .chain(
            creditors[ci..]
                .iter()
                .filter(|p| p.magnitude.exceeds(epsilon))
                .map(|p| Balance {
                    name: p.name.clone(),
                    amount: p.magnitude,
                }),
        )
        .chain(
            debtors[di..]
                .iter()
                .filter(|p| p.magnitude.exceeds(epsilon))
                .map(|p| Balance {
                    name: p.name.clone(),
                    amount: -p.magnitude,
                }),
        )
        .collect();

    if !unsettled.is_empty() {
        let leftover: Decimal = unsettled.iter().map(|b| b.amount).sum();
        tracing::warn!(
            "Settlement left {} player(s) unsettled, leftover {}",
            unsettled.len(),
            leftover
        );
    }

    Optimization {
        transfers,
        unsettled,
    }
}
