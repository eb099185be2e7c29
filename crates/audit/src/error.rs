//! Audit errors

use ledgerguard_lifecycle::TransitionError;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the audit trail
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Duplicate audit entry id: {0}")]
    DuplicateEntry(Uuid),

    #[error("Audit entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Audit write timed out after {0}ms")]
    Timeout(u64),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rejected transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

impl AuditError {
    /// Whether the caller may reasonably retry the same write later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuditError::Timeout(_) | AuditError::Storage(_) | AuditError::Io(_)
        )
    }
}
