//! In-memory audit repository
//!
//! Used by tests and as the index behind the JSONL store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerguard_core::VerificationStatus;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entry::AuditLogEntry;
use crate::error::{AuditError, AuditResult};
use crate::repository::{AuditFilter, AuditRepository};

/// Ordered entries with an id index
#[derive(Debug, Default)]
pub(crate) struct EntryLog {
    entries: Vec<AuditLogEntry>,
    positions: HashMap<Uuid, usize>,
}

impl EntryLog {
    pub(crate) fn contains(&self, id: &Uuid) -> bool {
        self.positions.contains_key(id)
    }

    pub(crate) fn push(&mut self, entry: AuditLogEntry) -> AuditResult<()> {
        if self.contains(&entry.id) {
            return Err(AuditError::DuplicateEntry(entry.id));
        }
        self.positions.insert(entry.id, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub(crate) fn stamp(
        &mut self,
        id: Uuid,
        status: VerificationStatus,
        verified_at: DateTime<Utc>,
    ) -> AuditResult<()> {
        let position = *self
            .positions
            .get(&id)
            .ok_or(AuditError::EntryNotFound(id))?;
        let entry = &mut self.entries[position];
        entry.verification_status = status;
        entry.verified_at = Some(verified_at);
        Ok(())
    }

    pub(crate) fn list(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
        filter.paginate(self.entries.iter().filter(|e| filter.matches(e)))
    }

    pub(crate) fn count(&self, filter: &AuditFilter) -> u64 {
        self.entries.iter().filter(|e| filter.matches(e)).count() as u64
    }

    pub(crate) fn last(&self) -> Option<&AuditLogEntry> {
        self.entries.last()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Volatile audit store
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    log: RwLock<EntryLog>,
}

impl InMemoryAuditRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a repository with existing entries in the given order
    ///
    /// For fixtures and offline replays of exported archives.
    pub fn with_entries(entries: impl IntoIterator<Item = AuditLogEntry>) -> AuditResult<Self> {
        let mut log = EntryLog::default();
        for entry in entries {
            log.push(entry)?;
        }
        Ok(Self {
            log: RwLock::new(log),
        })
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }

    /// Whether the repository is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn create(&self, entry: &AuditLogEntry) -> AuditResult<()> {
        self.log.write().await.push(entry.clone())
    }

    async fn list(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditLogEntry>> {
        filter.validate()?;
        Ok(self.log.read().await.list(filter))
    }

    async fn count(&self, filter: &AuditFilter) -> AuditResult<u64> {
        filter.validate()?;
        Ok(self.log.read().await.count(filter))
    }

    async fn last_entry(&self) -> AuditResult<Option<AuditLogEntry>> {
        Ok(self.log.read().await.last().cloned())
    }

    async fn stamp_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        verified_at: DateTime<Utc>,
    ) -> AuditResult<()> {
        self.log.write().await.stamp(id, status, verified_at)
    }
}
