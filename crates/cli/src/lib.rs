//! LedgerGuard CLI - Operator tooling
//!
//! Wires the audit writer, verifier and report generator over a data
//! directory for the `ledgerguard` binary.

pub mod commands;
pub mod context;

pub use context::{AppContext, LedgerGuardConfig};
