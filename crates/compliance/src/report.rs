//! Compliance Report Generator
//!
//! Aggregates audit activity over a period and embeds the integrity verdict
//! for the same period.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ledgerguard_audit::{AuditFilter, AuditLogEntry, AuditRepository};
use ledgerguard_core::AuditAction;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::config::ComplianceConfig;
use crate::error::ComplianceResult;
use crate::verifier::{IntegrityStatus, IntegrityVerifier};

/// Regulatory framework a report is prepared for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Soc2,
    PciDss,
    Gdpr,
    Internal,
}

/// Periodic summary of audit activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub id: Uuid,
    pub report_type: ReportType,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,

    pub total_events: u64,
    pub unique_users: u64,
    pub events_by_action: BTreeMap<AuditAction, u64>,
    pub security_events: u64,
    pub failed_logins: u64,
    pub data_exports: u64,
    pub permission_changes: u64,

    pub integrity_check_status: IntegrityStatus,
    pub hash_chain_valid: bool,
}

/// Running counters for one scan
#[derive(Debug, Default)]
struct Tally {
    total_events: u64,
    users: HashSet<String>,
    events_by_action: BTreeMap<AuditAction, u64>,
    security_events: u64,
    failed_logins: u64,
    data_exports: u64,
    permission_changes: u64,
}

impl Tally {
    fn record(&mut self, entry: &AuditLogEntry) {
        self.total_events += 1;
        self.users.insert(entry.user_id.clone());
        *self.events_by_action.entry(entry.action).or_insert(0) += 1;

        if entry.action.is_security_event() {
            self.security_events += 1;
        }
        if entry.is_failed_login() {
            self.failed_logins += 1;
        }
        if entry.action == AuditAction::DataExport {
            self.data_exports += 1;
        }
        if entry.action.is_permission_change() {
            self.permission_changes += 1;
        }
    }
}

/// Builds compliance reports from the audit repository
pub struct ComplianceReportGenerator {
    repository: Arc<dyn AuditRepository>,
    verifier: IntegrityVerifier,
    page_size: usize,
}

impl ComplianceReportGenerator {
    pub fn new(repository: Arc<dyn AuditRepository>, config: ComplianceConfig) -> Self {
        let page_size = config.page_size.max(1);
        Self {
            verifier: IntegrityVerifier::new(Arc::clone(&repository), config),
            repository,
            page_size,
        }
    }

    /// Summarize `[period_start, period_end]`
    pub async fn generate_compliance_report(
        &self,
        report_type: ReportType,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> ComplianceResult<ComplianceReport> {
        let mut tally = Tally::default();
        let mut offset = 0usize;

        loop {
            let filter = AuditFilter::between(period_start, period_end).page(self.page_size, offset);
            let page = self.repository.list(&filter).await?;
            let fetched = page.len();

            for entry in &page {
                tally.record(entry);
            }

            if fetched < self.page_size {
                break;
            }
            offset += fetched;
        }

        let integrity = self.verifier.verify_integrity(period_start, period_end).await?;

        let report = ComplianceReport {
            id: Uuid::new_v4(),
            report_type,
            period_start,
            period_end,
            generated_at: Utc::now(),
            total_events: tally.total_events,
            unique_users: tally.users.len() as u64,
            events_by_action: tally.events_by_action,
            security_events: tally.security_events,
            failed_logins: tally.failed_logins,
            data_exports: tally.data_exports,
            permission_changes: tally.permission_changes,
            integrity_check_status: integrity.status,
            hash_chain_valid: integrity.is_valid(),
        };

        tracing::info!(
            report_id = %report.id,
            report_type = %report_type,
            events = report.total_events,
            integrity = %report.integrity_check_status,
            "Compliance report generated"
        );

        Ok(report)
    }
}
