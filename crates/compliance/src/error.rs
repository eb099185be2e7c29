//! Compliance errors
//!
//! Tampering and broken links are reported in results, not raised here.

use ledgerguard_audit::AuditError;
use thiserror::Error;

/// Errors from verification and reporting
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Audit repository error: {0}")]
    Audit(#[from] AuditError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for compliance operations
pub type ComplianceResult<T> = Result<T, ComplianceError>;
