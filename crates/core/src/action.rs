//! Audit actions
//!
//! Persisted as lower-case snake_case strings. The string form is part of
//! the hash input, so renaming a variant breaks verification of existing
//! chains.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Every action the audit trail knows how to record
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    Deposit,
    Withdrawal,
    Trade,
    KycSubmit,
    KycApprove,
    KycReject,
    DataExport,
    DataDelete,
    SettingsChange,
    StatusTransition,
    AccountCreate,
    AccountUpdate,
    AccountDelete,
    ApiKeyCreate,
    ApiKeyRevoke,
    PasswordChange,
    MfaEnable,
    MfaDisable,
    PermissionChange,
    AdminAction,
}

impl AuditAction {
    /// Actions counted as security events in compliance reports
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            AuditAction::Login
                | AuditAction::Logout
                | AuditAction::PasswordChange
                | AuditAction::MfaEnable
                | AuditAction::MfaDisable
                | AuditAction::ApiKeyCreate
                | AuditAction::ApiKeyRevoke
                | AuditAction::PermissionChange
                | AuditAction::AdminAction
                | AuditAction::DataDelete
        )
    }

    /// Actions that change what a principal is allowed to do
    pub fn is_permission_change(&self) -> bool {
        matches!(
            self,
            AuditAction::PermissionChange | AuditAction::ApiKeyCreate | AuditAction::ApiKeyRevoke
        )
    }
}
