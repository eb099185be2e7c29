//! JSON export of audit entries

use std::path::Path;

use crate::entry::AuditLogEntry;
use crate::error::AuditResult;

/// Serialize entries as an indented JSON array
///
/// Empty input yields `[]`.
pub fn export_entries(entries: &[AuditLogEntry]) -> AuditResult<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Write an export file, replacing any previous one at `path`
pub fn write_export(path: &Path, entries: &[AuditLogEntry]) -> AuditResult<()> {
    let json = export_entries(entries)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), count = entries.len(), "Wrote audit export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Metadata;
    use chrono::Utc;
    use ledgerguard_core::{AuditAction, VerificationStatus};
    use uuid::Uuid;

    fn entry() -> AuditLogEntry {
        let mut metadata = Metadata::new();
        metadata.insert("status".into(), "success".into());
        metadata.insert("method".into(), "passkey".into());

        AuditLogEntry {
            id: Uuid::new_v4(),
            user_id: "alice".into(),
            action: AuditAction::Login,
            resource: "session".into(),
            resource_id: None,
            ip_address: "203.0.113.9".into(),
            user_agent: "android/14".into(),
            metadata,
            created_at: Utc::now(),
            previous_hash: String::new(),
            current_hash: "0f".repeat(32),
            verified_at: None,
            verification_status: VerificationStatus::Pending,
        }
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(export_entries(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_export_is_pretty_and_parseable() {
        let entries = vec![entry(), entry()];
        let json = export_entries(&entries).unwrap();

        assert!(json.starts_with("[\n  {"));
        // metadata keys come out sorted
        let method = json.find("\"method\"").unwrap();
        let status = json.find("\"status\"").unwrap();
        assert!(method < status);

        let parsed: Vec<AuditLogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        write_export(&path, &[entry()]).unwrap();
        let parsed: Vec<AuditLogEntry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
