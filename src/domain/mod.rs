//! Domain types for session settlement.
//!
//! This module provides:
//! - Lossless money handling via the Decimal wrapper
//! - Domain primitives: PlayerName, TransferId
//! - PlayerResult, transfer legs and ledger entries with camelCase JSON

pub mod decimal;
pub mod player;
pub mod primitives;
pub mod transfer;

pub use decimal::Decimal;
pub use player::PlayerResult;
pub use primitives::{PlayerName, TransferId};
pub use transfer::{PinnedTransfer, Transfer, TransferLeg, TransferOrigin};
