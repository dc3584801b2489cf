//! Session-level ownership of settlement state.
//!
//! This module provides:
//! - Staleness tracking around the single active ledger
//! - The session owner that edits inputs and drives recomputation
//! - JSON session file loading for the command-line runner

pub mod file;
pub mod settlement;
pub mod state;

pub use file::{load_session_file, LoadError, SessionFile};
pub use settlement::{RecomputeReport, SettlementSession};
pub use state::{Freshness, SessionSettlementState};
