//! Transfer ledger: merged manual and optimized transfers with payment state.

use crate::domain::{
    Decimal, PinnedTransfer, PlayerName, Transfer, TransferId, TransferLeg, TransferOrigin,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub mod fingerprint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("unknown transfer id: {0}")]
    UnknownTransfer(TransferId),
}

/// Ordered list of a session's transfers. Serializes as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<Transfer>,
}

/// Merge pinned transfers (as `manual`) and optimizer legs (as `optimized`)
/// into one ledger, pinned first. Every entry starts unpaid.
///
/// Ids are `from_to`; a pair appearing more than once gets `from_to_2`,
/// `from_to_3`, ... in ledger order, so equal inputs produce equal ids.
pub fn build_ledger(
    pinned: &[PinnedTransfer],
    optimized: &[TransferLeg],
    currency_scale: u32,
    created_at: DateTime<Utc>,
) -> Ledger {
    let mut occurrences: HashMap<(&PlayerName, &PlayerName), usize> = HashMap::new();
    let tagged = pinned
        .iter()
        .map(|leg| (leg, TransferOrigin::Manual))
        .chain(optimized.iter().map(|leg| (leg, TransferOrigin::Optimized)));

    let mut entries = Vec::with_capacity(pinned.len() + optimized.len());
    for (leg, origin) in tagged {
        let seen = occurrences.entry((&leg.from, &leg.to)).or_insert(0);
        *seen += 1;
        entries.push(Transfer {
            id: TransferId::for_pair(&leg.from, &leg.to, *seen),
            from: leg.from.clone(),
            to: leg.to.clone(),
            amount: leg.amount.round_currency(currency_scale),
            origin,
            is_paid: false,
            created_at,
        });
    }

    Ledger { entries }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[Transfer] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transfer> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &TransferId) -> Option<&Transfer> {
        self.entries.iter().find(|t| &t.id == id)
    }

    /// Return a copy with one entry's paid flag set. Amounts are untouched.
    pub fn mark_paid(&self, id: &TransferId, paid: bool) -> Result<Ledger, LedgerError> {
        let mut updated = self.clone();
        let entry = updated
            .entries
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| LedgerError::UnknownTransfer(id.clone()))?;
        entry.is_paid = paid;
        Ok(updated)
    }

    /// True iff the ledger is empty or every entry is paid.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|t| t.is_paid)
    }

    pub fn paid_count(&self) -> usize {
        self.entries.iter().filter(|t| t.is_paid).count()
    }

    pub fn total_amount(&self) -> Decimal {
        self.entries.iter().map(|t| t.amount).sum()
    }

    /// Total moving from `from` to `to` across manual and optimized entries.
    pub fn amount_between(&self, from: &PlayerName, to: &PlayerName) -> Decimal {
        self.entries
            .iter()
            .filter(|t| &t.from == from && &t.to == to)
            .map(|t| t.amount)
            .sum()
    }

    /// Paid flags keyed by transfer id, the shape a session record stores.
    pub fn paid_map(&self) -> BTreeMap<String, bool> {
        self.entries
            .iter()
            .map(|t| (t.id.to_string(), t.is_paid))
            .collect()
    }

    /// Copy persisted paid flags onto matching ids. Unknown keys are ignored.
    pub fn with_paid_flags(&self, flags: &BTreeMap<String, bool>) -> Ledger {
        let mut updated = self.clone();
        for entry in &mut updated.entries {
            if let Some(paid) = flags.get(entry.id.as_str()) {
                entry.is_paid = *paid;
            }
        }
        updated
    }
}
