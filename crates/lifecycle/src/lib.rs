//! LedgerGuard Lifecycle - Status transition policy
//!
//! Every money-movement entity moves through a fixed status graph. This crate
//! owns those graphs and nothing else: it answers "is A → B legal?" and never
//! touches entity storage.
//!
//! # Key Types
//! - `StatusMachine`: Adjacency-table contract implemented per status enum
//! - `DepositStatus`, `WithdrawalStatus`, `CardTransactionStatus`
//! - `TransitionError`: Caller-facing validation failure
//!
//! The policy must be consulted, and obeyed, before the caller persists a new
//! status. Making "validate → persist → audit" atomic is the caller's job.

pub mod card;
pub mod deposit;
pub mod error;
pub mod machine;
pub mod withdrawal;

pub use card::CardTransactionStatus;
pub use deposit::DepositStatus;
pub use error::TransitionError;
pub use machine::{can_transition, is_terminal, is_valid_status, validate_transition, StatusMachine};
pub use withdrawal::WithdrawalStatus;
