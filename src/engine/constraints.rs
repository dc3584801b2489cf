use super::balances::Balances;
use super::validation::{check_pin, PinRejection, RejectedPin};
use crate::domain::{Decimal, PinnedTransfer};

/// Residual balances plus any pins that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinApplication {
    pub residual: Balances,
    pub rejected: Vec<RejectedPin>,
}

/// Apply pinned transfers, failing if any pin is invalid.
///
/// On success the returned balances are what the optimizer still has to
/// settle. On failure nothing is applied and every rejected pin is listed.
pub fn apply_pinned(
    balances: &Balances,
    pinned: &[PinnedTransfer],
) -> Result<Balances, PinRejection> {
    let application = apply_pinned_lenient(balances, pinned);
    if application.rejected.is_empty() {
        Ok(application.residual)
    } else {
        Err(PinRejection(application.rejected))
    }
}

/// Apply pinned transfers, skipping invalid ones.
///
/// Pins are applied in list order. Each one moves both parties toward
/// settlement according to their current sign:
/// - `from`: a debtor's debt shrinks by `amount`; otherwise its credit shrinks.
/// - `to`: a creditor's credit shrinks by `amount`; otherwise its balance grows.
pub fn apply_pinned_lenient(balances: &Balances, pinned: &[PinnedTransfer]) -> PinApplication {
    let mut residual = balances.clone();
    let mut rejected = Vec::new();

    for (index, pin) in pinned.iter().enumerate() {
        if let Err(reason) = check_pin(pin, |name| residual.contains(name)) {
            tracing::warn!("Skipping pinned transfer #{}: {}", index, reason);
            rejected.push(RejectedPin {
                index,
                pin: pin.clone(),
                reason,
            });
            continue;
        }

        if let Some(from) = residual.get_mut(&pin.from) {
            if !from.is_negative() {
                tracing::warn!(
                    "Pinned transfer #{} is paid by {} who is not a debtor ({})",
                    index,
                    pin.from,
                    from
                );
            }
            *from = settle_payer(*from, pin.amount);
        }
        if let Some(to) = residual.get_mut(&pin.to) {
            if !to.is_positive() {
                tracing::warn!(
                    "Pinned transfer #{} is received by {} who is not a creditor ({})",
                    index,
                    pin.to,
                    to
                );
            }
            *to = settle_payee(*to, pin.amount);
        }

        tracing::debug!(
            "Applied pin #{} {} -> {} {}",
            index,
            pin.from,
            pin.to,
            pin.amount
        );
    }

    PinApplication { residual, rejected }
}

fn settle_payer(balance: Decimal, amount: Decimal) -> Decimal {
    if balance.is_negative() {
        balance + amount
    } else {
        balance - amount
    }
}

fn settle_payee(balance: Decimal, amount: Decimal) -> Decimal {
    if balance.is_positive() {
        balance - amount
    } else {
        balance + amount
    }
}
