//! LedgerGuard Compliance - Integrity verification and reporting
//!
//! Reads the audit trail written by `ledgerguard-audit`; never writes
//! entries (verification stamps aside).
//!
//! ## Key Components
//!
//! - [`config::ComplianceConfig`] - Page size, window anchor, stamping
//! - [`verifier::IntegrityVerifier`] - Hash chain replay over a window
//! - [`report::ComplianceReportGenerator`] - Periodic activity summary

pub mod config;
pub mod error;
pub mod report;
pub mod verifier;

pub use config::{ComplianceConfig, WindowAnchor};
pub use error::{ComplianceError, ComplianceResult};
pub use report::{ComplianceReport, ComplianceReportGenerator, ReportType};
pub use verifier::{IntegrityStatus, IntegrityVerificationResult, IntegrityVerifier};
