//! Boundary validation for player rosters and pinned transfers.

use crate::domain::{Decimal, PinnedTransfer, PlayerName, PlayerResult};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("duplicate player name: {0}")]
    DuplicatePlayer(PlayerName),
    #[error("{field} for {player} must not be negative, got {value}")]
    NegativeAmount {
        player: PlayerName,
        field: &'static str,
        value: Decimal,
    },
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerName),
    #[error("{0} cannot transfer to themselves")]
    SelfTransfer(PlayerName),
    #[error("transfer amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// A pinned transfer that could not be applied, with its list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPin {
    pub index: usize,
    pub pin: PinnedTransfer,
    pub reason: ValidationError,
}

impl std::fmt::Display for RejectedPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pin #{} ({} -> {} {}): {}",
            self.index, self.pin.from, self.pin.to, self.pin.amount, self.reason
        )
    }
}

/// Every rejected pin from one application pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} pinned transfer(s) rejected", .0.len())]
pub struct PinRejection(pub Vec<RejectedPin>);

/// Reject blank names, duplicate names and negative figures.
pub fn validate_players(players: &[PlayerResult]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for player in players {
        if player.name.is_blank() {
            return Err(ValidationError::EmptyName);
        }
        if !seen.insert(&player.name) {
            return Err(ValidationError::DuplicatePlayer(player.name.clone()));
        }
        if player.total_buy_in.is_negative() {
            return Err(ValidationError::NegativeAmount {
                player: player.name.clone(),
                field: "totalBuyIn",
                value: player.total_buy_in,
            });
        }
        if player.cash_out.is_negative() {
            return Err(ValidationError::NegativeAmount {
                player: player.name.clone(),
                field: "cashOut",
                value: player.cash_out,
            });
        }
    }
    Ok(())
}

/// Check one pin against the set of known players.
pub fn check_pin<F>(pin: &PinnedTransfer, is_known: F) -> Result<(), ValidationError>
where
    F: Fn(&PlayerName) -> bool,
{
    if !pin.amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount(pin.amount));
    }
    if pin.from == pin.to {
        return Err(ValidationError::SelfTransfer(pin.from.clone()));
    }
    for name in [&pin.from, &pin.to] {
        if !is_known(name) {
            return Err(ValidationError::UnknownPlayer(name.clone()));
        }
    }
    Ok(())
}

/// Validate every pin against a roster, collecting all rejections.
pub fn validate_pinned(
    players: &[PlayerResult],
    pinned: &[PinnedTransfer],
) -> Result<(), PinRejection> {
    let known: HashSet<&PlayerName> = players.iter().map(|p| &p.name).collect();
    let rejected: Vec<RejectedPin> = pinned
        .iter()
        .enumerate()
        .filter_map(|(index, pin)| {
            check_pin(pin, |name| known.contains(name))
                .err()
                .map(|reason| RejectedPin {
                    index,
                    pin: pin.clone(),
                    reason,
                })
        })
        .collect();

    if rejected.is_empty() {
        Ok(())
    } else {
        Err(PinRejection(rejected))
    }
}
