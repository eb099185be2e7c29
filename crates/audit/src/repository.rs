//! Storage boundary for audit entries

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerguard_core::{AuditAction, VerificationStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entry::AuditLogEntry;
use crate::error::{AuditError, AuditResult};

/// Append-only audit store
///
/// Implementations keep entries in append order; `list` returns matches in
/// that order. Nothing may be updated except the verification stamp.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append an entry; rejects an id that already exists
    async fn create(&self, entry: &AuditLogEntry) -> AuditResult<()>;

    /// Entries matching the filter, ascending by append order
    async fn list(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditLogEntry>>;

    /// Number of entries matching the filter (ignores limit/offset)
    async fn count(&self, filter: &AuditFilter) -> AuditResult<u64>;

    /// Most recently appended entry
    async fn last_entry(&self) -> AuditResult<Option<AuditLogEntry>>;

    /// Record a verification verdict on an existing entry
    async fn stamp_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        verified_at: DateTime<Utc>,
    ) -> AuditResult<()>;
}

/// Query over audit entries
///
/// Date bounds are inclusive. `limit == 0` means no limit at the repository
/// level; the writer clamps page sizes before calling in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFilter {
    pub user_id: Option<String>,
    pub action: Option<AuditAction>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl AuditFilter {
    /// Match everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Entries written by one actor
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Entries created in `[start, end]`
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }

    /// Restrict to one action
    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Set pagination
    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Reject inverted date ranges
    pub fn validate(&self) -> AuditResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AuditError::InvalidFilter(format!(
                    "start_date {} is after end_date {}",
                    start.to_rfc3339(),
                    end.to_rfc3339()
                )));
            }
        }
        Ok(())
    }

    /// Whether an entry passes the non-pagination criteria
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(ref user_id) = self.user_id {
            if &entry.user_id != user_id {
                return false;
            }
        }
        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if entry.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if entry.created_at > end {
                return false;
            }
        }
        true
    }

    /// Apply offset/limit to an ordered iterator of matches
    pub fn paginate<'a, I>(&self, matches: I) -> Vec<AuditLogEntry>
    where
        I: Iterator<Item = &'a AuditLogEntry>,
    {
        let limit = if self.limit == 0 { usize::MAX } else { self.limit };
        matches.skip(self.offset).take(limit).cloned().collect()
    }
}

/// One page of entries plus the total number of matches
#[derive(Debug, Clone, Serialize)]
pub struct AuditPage {
    pub entries: Vec<AuditLogEntry>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
}

impl AuditPage {
    /// Whether more matches exist after this page
    pub fn has_more(&self) -> bool {
        ((self.offset + self.entries.len()) as u64) < self.total
    }
}
