//! Domain primitives: PlayerName, TransferId.

use serde::{Deserialize, Serialize};

/// Player identifier within a session (unique per session).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(pub String);

impl PlayerName {
    /// Create a PlayerName from a string.
    pub fn new(name: impl Into<String>) -> Self {
        PlayerName(name.into())
    }

    /// Get the name as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name is empty after trimming whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerName {
    fn from(name: &str) -> Self {
        PlayerName(name.to_string())
    }
}

/// Ledger entry identifier, unique within one ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(pub String);

impl TransferId {
    /// Conventional `from_to` key. `occurrence` is 1-based; repeats of the
    /// same pair get a numeric suffix (`from_to_2`).
    pub fn for_pair(from: &PlayerName, to: &PlayerName, occurrence: usize) -> Self {
        if occurrence <= 1 {
            TransferId(format!("{}_{}", from, to))
        } else {
            TransferId(format!("{}_{}_{}", from, to, occurrence))
        }
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TransferId {
    fn from(id: &str) -> Self {
        TransferId(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_display() {
        let name = PlayerName::new("Alice");
        assert_eq!(name.to_string(), "Alice");
        assert!(!name.is_blank());
        assert!(PlayerName::new("  ").is_blank());
    }

    #[test]
    fn test_transfer_id_for_pair() {
        let from = PlayerName::new("B");
        let to = PlayerName::new("A");
        assert_eq!(TransferId::for_pair(&from, &to, 1).as_str(), "B_A");
        assert_eq!(TransferId::for_pair(&from, &to, 2).as_str(), "B_A_2");
    }

    #[test]
    fn test_player_name_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerName::new("Bob")).unwrap();
        assert_eq!(json, "\"Bob\"");
    }
}
