//! Pure computation engine for session settlement.
//!
//! raw player figures -> balances -> pinned transfers applied -> residual
//! balances -> optimized transfers.

pub mod balances;
pub mod constraints;
pub mod optimizer;
pub mod validation;

pub use balances::{compute_balances, Balance, Balances};
pub use constraints::{apply_pinned, apply_pinned_lenient, PinApplication};
pub use optimizer::{optimize, Optimization};
pub use validation::{
    validate_pinned, validate_players, PinRejection, RejectedPin, ValidationError,
};
