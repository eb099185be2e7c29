//! LedgerGuard Core - Shared domain types
//!
//! This crate contains the value types shared by the lifecycle policy,
//! the audit writer and the compliance tooling:
//! - `AuditAction`: Closed set of auditable actions
//! - `EntityKind`: Money-movement entity kinds with a status lifecycle
//! - `TriggerSource`: Who or what caused a status transition
//! - `VerificationStatus`: Integrity verdict stamped on an audit entry

pub mod action;
pub mod entity;
pub mod time;
pub mod verification;

pub use action::AuditAction;
pub use entity::{EntityKind, TriggerSource};
pub use time::format_rfc3339_nanos;
pub use verification::VerificationStatus;
