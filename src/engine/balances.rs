use crate::domain::{Decimal, PlayerName, PlayerResult};
use serde::{Deserialize, Serialize};

/// One player's position: positive = creditor, negative = debtor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub name: PlayerName,
    pub amount: Decimal,
}

/// Insertion-ordered mapping from player name to balance.
///
/// Order is the order players were first supplied; the optimizer's
/// insertion policy depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    entries: Vec<Balance>,
}

impl Balances {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set a player's balance. An existing name is overwritten in place.
    pub fn insert(&mut self, name: PlayerName, amount: Decimal) {
        match self.entries.iter_mut().find(|b| b.name == name) {
            Some(existing) => existing.amount = amount,
            None => self.entries.push(Balance { name, amount }),
        }
    }

    pub fn get(&self, name: &PlayerName) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|b| &b.name == name)
            .map(|b| b.amount)
    }

    pub fn get_mut(&mut self, name: &PlayerName) -> Option<&mut Decimal> {
        self.entries
            .iter_mut()
            .find(|b| &b.name == name)
            .map(|b| &mut b.amount)
    }

    pub fn contains(&self, name: &PlayerName) -> bool {
        self.entries.iter().any(|b| &b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances; zero for a balanced session.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|b| b.amount).sum()
    }
}

impl FromIterator<(PlayerName, Decimal)> for Balances {
    fn from_iter<I: IntoIterator<Item = (PlayerName, Decimal)>>(iter: I) -> Self {
        let mut balances = Balances::new();
        for (name, amount) in iter {
            balances.insert(name, amount);
        }
        balances
    }
}

/// Derive each player's net result (`cash_out - total_buy_in`).
///
/// Duplicate names are not rejected here: the last record wins and keeps the
/// position of the first. Run [`super::validate_players`] first to reject them.
pub fn compute_balances(players: &[PlayerResult]) -> Balances {
    players
        .iter()
        .map(|p| (p.name.clone(), p.net_result()))
        .collect()
}
