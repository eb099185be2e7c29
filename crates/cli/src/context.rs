//! Application context - wires everything together

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ledgerguard_audit::{AuditConfig, AuditWriter, JsonlAuditRepository};
use ledgerguard_compliance::{ComplianceConfig, ComplianceReportGenerator, IntegrityVerifier};
use serde::{Deserialize, Serialize};

/// Combined configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerGuardConfig {
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

impl LedgerGuardConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.audit.validate()?;
        config.compliance.validate()?;
        Ok(config)
    }
}

/// Application context
pub struct AppContext {
    pub writer: AuditWriter,
    config: LedgerGuardConfig,
    audit_path: PathBuf,
}

impl AppContext {
    /// Open the audit store under `data_path/audit` and seed the writer
    pub async fn new(data_path: impl AsRef<Path>, config: LedgerGuardConfig) -> Result<Self, anyhow::Error> {
        let audit_path = data_path.as_ref().join("audit");
        let repository = JsonlAuditRepository::open(&audit_path)?;
        let writer = AuditWriter::open(Arc::new(repository), config.audit.clone()).await?;

        tracing::debug!(
            path = %audit_path.display(),
            worm = config.audit.worm_enabled,
            "Audit context ready"
        );

        Ok(Self {
            writer,
            config,
            audit_path,
        })
    }

    pub fn verifier(&self) -> IntegrityVerifier {
        IntegrityVerifier::new(self.writer.repository(), self.config.compliance.clone())
    }

    pub fn report_generator(&self) -> ComplianceReportGenerator {
        ComplianceReportGenerator::new(self.writer.repository(), self.config.compliance.clone())
    }

    pub fn config(&self) -> &LedgerGuardConfig {
        &self.config
    }

    /// Directory holding the audit JSONL files
    pub fn audit_path(&self) -> &Path {
        &self.audit_path
    }
}
