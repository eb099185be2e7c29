//! Audit entry types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ledgerguard_core::{AuditAction, EntityKind, TriggerSource, VerificationStatus};
use ledgerguard_lifecycle::{StatusMachine, TransitionError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Open string-keyed payload attached to an entry (sorted for stable export)
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A persisted audit record
///
/// Immutable once written. Only `verified_at` and `verification_status` may
/// be stamped afterwards; neither is part of the hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    /// Actor who performed the action
    pub user_id: String,
    pub action: AuditAction,
    /// Resource family (e.g. "deposits", "api_keys")
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Nanosecond precision is part of the hash input
    pub created_at: DateTime<Utc>,
    /// Empty for the first entry of a chain
    #[serde(default)]
    pub previous_hash: String,
    #[serde(default)]
    pub current_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
}

impl AuditLogEntry {
    /// Metadata value as a string slice, if present and a string
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Whether this entry records a failed login attempt
    pub fn is_failed_login(&self) -> bool {
        self.action == AuditAction::Login && self.metadata_str("status") == Some("failed")
    }

    /// Whether this entry was written with chaining enabled
    pub fn is_chained(&self) -> bool {
        !self.current_hash.is_empty()
    }
}

/// Network origin of the request that caused an audited action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    pub ip_address: String,
    pub user_agent: String,
}

impl RequestOrigin {
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Origin for actions taken by internal jobs
    pub fn internal() -> Self {
        Self::new("127.0.0.1", "ledgerguard/internal")
    }
}

/// What a caller asks the writer to record
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub user_id: String,
    pub action: AuditAction,
    pub resource: String,
    pub resource_id: Option<String>,
    pub origin: RequestOrigin,
    pub metadata: Metadata,
}

impl AuditRequest {
    /// Create a request with no resource id, origin or metadata
    pub fn new(user_id: impl Into<String>, action: AuditAction, resource: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            resource: resource.into(),
            resource_id: None,
            origin: RequestOrigin::default(),
            metadata: Metadata::new(),
        }
    }

    /// Set resource id
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Set request origin
    pub fn with_origin(mut self, origin: RequestOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Replace metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a single metadata value
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A status change of a money-movement entity
///
/// Recorded through the writer with action `status_transition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransitionLog {
    pub entity_id: String,
    pub entity_type: EntityKind,
    pub from_status: String,
    pub to_status: String,
    pub trigger: TriggerSource,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl StatusTransitionLog {
    /// Build a log for a transition the lifecycle allows
    pub fn checked<S: StatusMachine>(
        entity_id: impl Into<String>,
        from: S,
        to: S,
        trigger: TriggerSource,
    ) -> Result<Self, TransitionError> {
        from.validate_transition(to)?;
        Ok(Self {
            entity_id: entity_id.into(),
            entity_type: S::KIND,
            from_status: from.to_string(),
            to_status: to.to_string(),
            trigger,
            timestamp: Utc::now(),
            metadata: Metadata::new(),
        })
    }

    /// Attach extra context (provider reference, failure reason)
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
