//! Ledger ownership and staleness tracking.

use crate::approval::{on_payment_change, SessionStatus};
use crate::error::SettlementError;
use crate::ledger::Ledger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the ledger reflects the current inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Fresh,
    Stale,
}

/// A session's one active ledger plus its staleness flag.
///
/// Starts `Stale` with an empty ledger. Any balance-affecting edit moves it
/// to `Stale`; installing a freshly built ledger moves it to `Fresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettlementState {
    ledger: Ledger,
    freshness: Freshness,
    computed_at: Option<DateTime<Utc>>,
}

impl SessionSettlementState {
    pub fn new() -> Self {
        Self {
            ledger: Ledger::new(),
            freshness: Freshness::Stale,
            computed_at: None,
        }
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }

    /// When the current ledger was built, if ever.
    pub fn computed_at(&self) -> Option<DateTime<Utc>> {
        self.computed_at
    }

    pub fn mark_stale(&mut self) {
        if self.freshness == Freshness::Fresh {
            tracing::debug!("Settlement ledger marked stale");
        }
        self.freshness = Freshness::Stale;
    }

    /// Replace the ledger wholesale and mark it fresh.
    pub fn install(&mut self, ledger: Ledger, computed_at: DateTime<Utc>) {
        self.ledger = ledger;
        self.freshness = Freshness::Fresh;
        self.computed_at = Some(computed_at);
    }

    /// The ledger, refusing while stale.
    pub fn ledger(&self) -> Result<&Ledger, SettlementError> {
        match self.freshness {
            Freshness::Fresh => Ok(&self.ledger),
            Freshness::Stale => Err(SettlementError::Stale),
        }
    }

    /// The last built ledger regardless of staleness, for display only.
    pub fn last_ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Replace the fresh ledger with an updated copy of itself (payment
    /// state changes only).
    pub(crate) fn update_payments<F>(&mut self, update: F) -> Result<SessionStatus, SettlementError>
    where
        F: FnOnce(&Ledger) -> Result<Ledger, SettlementError>,
    {
        let updated = update(self.ledger()?)?;
        self.ledger = updated;
        Ok(self.status())
    }

    /// `Pending` while stale; otherwise derived from the ledger's paid flags.
    pub fn status(&self) -> SessionStatus {
        match self.freshness {
            Freshness::Stale => SessionStatus::Pending,
            Freshness::Fresh => on_payment_change(&self.ledger),
        }
    }
}

impl Default for SessionSettlementState {
    fn default() -> Self {
        Self::new()
    }
}
