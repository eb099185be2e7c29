//! Integrity Verifier - Hash chain replay over a time window
//!
//! Each entry is checked two ways:
//! - its stored `current_hash` must match a fresh computation (else tampered)
//! - its `previous_hash` must equal the prior entry's `current_hash`
//!   (else broken link)
//!
//! Entries are fetched in pages; the link carries across page boundaries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ledgerguard_audit::{verify_entry_hash, AuditFilter, AuditRepository};
use ledgerguard_core::VerificationStatus;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::config::{ComplianceConfig, WindowAnchor};
use crate::error::ComplianceResult;

/// Overall verdict for a window
///
/// Tampering outranks broken links.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IntegrityStatus {
    Verified,
    ChainBroken,
    Compromised,
}

/// Outcome of replaying a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityVerificationResult {
    pub status: IntegrityStatus,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub verified_at: DateTime<Utc>,
    pub total_logs: u64,
    /// Entries whose hash recomputed correctly
    pub verified_logs: u64,
    /// Entries whose hash did not recompute, in scan order
    pub tampered_logs: Vec<Uuid>,
    /// Entries whose `previous_hash` did not match their predecessor
    pub broken_links: Vec<Uuid>,
}

impl IntegrityVerificationResult {
    pub fn is_valid(&self) -> bool {
        self.status == IntegrityStatus::Verified
    }
}

/// Replays stored entries against the hash chain
pub struct IntegrityVerifier {
    repository: Arc<dyn AuditRepository>,
    config: ComplianceConfig,
}

impl IntegrityVerifier {
    pub fn new(repository: Arc<dyn AuditRepository>, config: ComplianceConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Verify `[start, end]` using the configured window anchor
    pub async fn verify_integrity(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ComplianceResult<IntegrityVerificationResult> {
        self.verify_range(start, end, &self.config.window_anchor).await
    }

    /// Verify `[start, end]` with an explicit anchor for the first entry
    ///
    /// Only repository failures are errors; a damaged chain is a result.
    pub async fn verify_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        anchor: &WindowAnchor,
    ) -> ComplianceResult<IntegrityVerificationResult> {
        let page_size = self.config.page_size.max(1);
        let mut expected_previous = anchor.expected_previous_hash().map(str::to_string);

        let mut total_logs = 0u64;
        let mut verified_logs = 0u64;
        let mut tampered_logs = Vec::new();
        let mut broken_links = Vec::new();
        let mut verdicts = Vec::new();
        let mut offset = 0usize;

        loop {
            let filter = AuditFilter::between(start, end).page(page_size, offset);
            let page = self.repository.list(&filter).await?;
            let fetched = page.len();

            for entry in page {
                total_logs += 1;

                if verify_entry_hash(&entry) {
                    verified_logs += 1;
                    verdicts.push((entry.id, VerificationStatus::Verified));
                } else {
                    tracing::warn!(
                        entry_id = %entry.id,
                        action = %entry.action,
                        user_id = %entry.user_id,
                        "Audit entry hash mismatch"
                    );
                    tampered_logs.push(entry.id);
                    verdicts.push((entry.id, VerificationStatus::Tampered));
                }

                if let Some(expected) = expected_previous.as_deref() {
                    if entry.previous_hash != expected {
                        tracing::warn!(
                            entry_id = %entry.id,
                            expected = %expected,
                            found = %entry.previous_hash,
                            "Audit chain link broken"
                        );
                        broken_links.push(entry.id);
                    }
                }
                expected_previous = Some(entry.current_hash);
            }

            if fetched < page_size {
                break;
            }
            offset += fetched;
        }

        let status = if !tampered_logs.is_empty() {
            IntegrityStatus::Compromised
        } else if !broken_links.is_empty() {
            IntegrityStatus::ChainBroken
        } else {
            IntegrityStatus::Verified
        };

        let verified_at = Utc::now();

        if self.config.stamp_verification {
            for (id, verdict) in verdicts {
                self.repository
                    .stamp_verification(id, verdict, verified_at)
                    .await?;
            }
        }

        tracing::info!(
            status = %status,
            total = total_logs,
            tampered = tampered_logs.len(),
            broken = broken_links.len(),
            "Integrity verification finished"
        );

        Ok(IntegrityVerificationResult {
            status,
            period_start: start,
            period_end: end,
            verified_at,
            total_logs,
            verified_logs,
            tampered_logs,
            broken_links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use ledgerguard_audit::{
        calculate_entry_hash, AuditError, AuditLogEntry, InMemoryAuditRepository, Metadata,
    };
    use ledgerguard_core::AuditAction;

    use crate::error::ComplianceError;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    /// A valid chain of `n` entries one second apart
    fn chain(n: usize) -> Vec<AuditLogEntry> {
        let mut entries: Vec<AuditLogEntry> = Vec::with_capacity(n);
        for i in 0..n {
            let mut entry = AuditLogEntry {
                id: Uuid::new_v4(),
                user_id: format!("user-{}", i % 3),
                action: AuditAction::Login,
                resource: "session".into(),
                resource_id: None,
                ip_address: "10.0.0.1".into(),
                user_agent: "test".into(),
                metadata: Metadata::new(),
                created_at: base_time() + Duration::seconds(i as i64),
                previous_hash: entries.last().map(|e| e.current_hash.clone()).unwrap_or_default(),
                current_hash: String::new(),
                verified_at: None,
                verification_status: VerificationStatus::Pending,
            };
            entry.current_hash = calculate_entry_hash(&entry);
            entries.push(entry);
        }
        entries
    }

    fn verifier(entries: Vec<AuditLogEntry>, config: ComplianceConfig) -> IntegrityVerifier {
        let repo = InMemoryAuditRepository::with_entries(entries).unwrap();
        IntegrityVerifier::new(Arc::new(repo), config)
    }

    fn whole_day() -> (DateTime<Utc>, DateTime<Utc>) {
        (base_time() - Duration::hours(1), base_time() + Duration::hours(23))
    }

    #[tokio::test]
    async fn test_empty_window_is_verified() {
        let (start, end) = whole_day();
        let result = verifier(vec![], ComplianceConfig::default())
            .verify_integrity(start, end)
            .await
            .unwrap();

        assert_eq!(result.status, IntegrityStatus::Verified);
        assert_eq!(result.total_logs, 0);
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn test_intact_chain_across_pages() {
        let config = ComplianceConfig {
            page_size: 2,
            ..Default::default()
        };
        let (start, end) = whole_day();
        let result = verifier(chain(7), config).verify_integrity(start, end).await.unwrap();

        assert_eq!(result.status, IntegrityStatus::Verified);
        assert_eq!(result.total_logs, 7);
        assert_eq!(result.verified_logs, 7);
        assert!(result.tampered_logs.is_empty());
        assert!(result.broken_links.is_empty());
    }

    #[tokio::test]
    async fn test_mutated_field_is_compromised() {
        let mut entries = chain(4);
        entries[2].ip_address = "198.51.100.66".into();
        let tampered = entries[2].id;

        let (start, end) = whole_day();
        let result = verifier(entries, ComplianceConfig::default())
            .verify_integrity(start, end)
            .await
            .unwrap();

        assert_eq!(result.status, IntegrityStatus::Compromised);
        assert_eq!(result.tampered_logs, vec![tampered]);
        assert!(result.broken_links.is_empty());
        assert_eq!(result.verified_logs, 3);
    }

    #[tokio::test]
    async fn test_removed_entry_breaks_chain() {
        let mut entries = chain(5);
        entries.remove(2);
        let successor = entries[2].id;

        let (start, end) = whole_day();
        let result = verifier(entries, ComplianceConfig::default())
            .verify_integrity(start, end)
            .await
            .unwrap();

        assert_eq!(result.status, IntegrityStatus::ChainBroken);
        assert_eq!(result.broken_links, vec![successor]);
        assert!(result.tampered_logs.is_empty());
    }

    #[tokio::test]
    async fn test_tampering_outranks_breaks() {
        let mut entries = chain(5);
        entries.remove(1);
        entries[3].user_id = "mallory".into();

        let (start, end) = whole_day();
        let result = verifier(entries, ComplianceConfig::default())
            .verify_integrity(start, end)
            .await
            .unwrap();

        assert_eq!(result.status, IntegrityStatus::Compromised);
        assert_eq!(result.broken_links.len(), 1);
        assert_eq!(result.tampered_logs.len(), 1);
    }

    #[tokio::test]
    async fn test_window_anchors() {
        let entries = chain(6);
        let checkpoint = entries[2].current_hash.clone();
        let start = entries[3].created_at;
        let end = entries[5].created_at;
        let verifier = verifier(entries, ComplianceConfig::default());

        let origin = verifier.verify_integrity(start, end).await.unwrap();
        assert_eq!(origin.status, IntegrityStatus::ChainBroken);
        assert_eq!(origin.broken_links.len(), 1);
        assert_eq!(origin.total_logs, 3);

        let unanchored = verifier
            .verify_range(start, end, &WindowAnchor::Unanchored)
            .await
            .unwrap();
        assert_eq!(unanchored.status, IntegrityStatus::Verified);

        let anchored = verifier
            .verify_range(start, end, &WindowAnchor::Checkpoint(checkpoint))
            .await
            .unwrap();
        assert_eq!(anchored.status, IntegrityStatus::Verified);

        let wrong = verifier
            .verify_range(start, end, &WindowAnchor::Checkpoint("00".repeat(32)))
            .await
            .unwrap();
        assert_eq!(wrong.status, IntegrityStatus::ChainBroken);
    }

    #[tokio::test]
    async fn test_unchained_entries_fail_verification() {
        let mut entries = chain(2);
        for entry in &mut entries {
            entry.previous_hash.clear();
            entry.current_hash.clear();
        }

        let (start, end) = whole_day();
        let result = verifier(entries, ComplianceConfig::default())
            .verify_integrity(start, end)
            .await
            .unwrap();

        assert_eq!(result.status, IntegrityStatus::Compromised);
        assert_eq!(result.tampered_logs.len(), 2);
    }

    #[tokio::test]
    async fn test_stamping_writes_verdicts() {
        let mut entries = chain(3);
        entries[1].resource = "elsewhere".into();
        let repo = Arc::new(InMemoryAuditRepository::with_entries(entries).unwrap());

        let config = ComplianceConfig {
            stamp_verification: true,
            ..Default::default()
        };
        let verifier = IntegrityVerifier::new(repo.clone(), config);
        let (start, end) = whole_day();
        verifier.verify_integrity(start, end).await.unwrap();

        let stored = repo.list(&AuditFilter::all()).await.unwrap();
        let verdicts: Vec<_> = stored.iter().map(|e| e.verification_status).collect();
        assert_eq!(
            verdicts,
            vec![
                VerificationStatus::Verified,
                VerificationStatus::Tampered,
                VerificationStatus::Verified,
            ]
        );
        assert!(stored.iter().all(|e| e.verified_at.is_some()));
    }

    #[tokio::test]
    async fn test_inverted_window_is_an_error() {
        let (start, end) = whole_day();
        let result = verifier(chain(1), ComplianceConfig::default())
            .verify_integrity(end, start)
            .await;

        assert!(matches!(
            result,
            Err(ComplianceError::Audit(AuditError::InvalidFilter(_)))
        ));
    }
}
