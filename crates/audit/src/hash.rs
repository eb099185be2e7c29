//! Hash chain utilities for audit integrity

use ledgerguard_core::format_rfc3339_nanos;
use sha2::{Digest, Sha256};

use crate::entry::AuditLogEntry;

/// `previous_hash` of the first entry in a chain
pub const GENESIS_PREVIOUS_HASH: &str = "";

/// Calculate SHA256 over the entry's identity fields and its predecessor link
///
/// Input order: id, user_id, action, resource, ip_address, created_at
/// (RFC3339, nanoseconds), previous_hash. User agent, metadata and
/// verification fields are not covered.
pub fn calculate_entry_hash(entry: &AuditLogEntry) -> String {
    let mut hasher = Sha256::new();

    hasher.update(entry.id.to_string().as_bytes());
    hasher.update(entry.user_id.as_bytes());
    hasher.update(entry.action.as_ref().as_bytes());
    hasher.update(entry.resource.as_bytes());
    hasher.update(entry.ip_address.as_bytes());
    hasher.update(format_rfc3339_nanos(&entry.created_at).as_bytes());
    hasher.update(entry.previous_hash.as_bytes());

    hex::encode(hasher.finalize())
}

/// Whether the stored `current_hash` matches a fresh computation
pub fn verify_entry_hash(entry: &AuditLogEntry) -> bool {
    entry.current_hash == calculate_entry_hash(entry)
}

/// Lower-case hex SHA256 shape check
pub fn is_hash_format(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Metadata;
    use chrono::{TimeZone, Utc};
    use ledgerguard_core::{AuditAction, VerificationStatus};
    use uuid::Uuid;

    fn create_entry(previous_hash: &str) -> AuditLogEntry {
        let mut entry = AuditLogEntry {
            id: Uuid::parse_str("6f1c2d3e-4a5b-4c6d-8e7f-0123456789ab").unwrap(),
            user_id: "user-42".to_string(),
            action: AuditAction::Withdrawal,
            resource: "withdrawals".to_string(),
            resource_id: Some("wd-1".to_string()),
            ip_address: "203.0.113.9".to_string(),
            user_agent: "android/14".to_string(),
            metadata: Metadata::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
            previous_hash: previous_hash.to_string(),
            current_hash: String::new(),
            verified_at: None,
            verification_status: VerificationStatus::Pending,
        };
        entry.current_hash = calculate_entry_hash(&entry);
        entry
    }

    #[test]
    fn test_hash_deterministic() {
        let entry = create_entry(GENESIS_PREVIOUS_HASH);
        assert_eq!(calculate_entry_hash(&entry), calculate_entry_hash(&entry));
        assert!(is_hash_format(&entry.current_hash));
    }

    #[test]
    fn test_hash_matches_concatenated_input() {
        let entry = create_entry("abc");
        let concatenated = format!(
            "{}{}{}{}{}{}{}",
            entry.id,
            entry.user_id,
            "withdrawal",
            entry.resource,
            entry.ip_address,
            "2025-01-15T09:30:00.123456789Z",
            "abc"
        );
        let expected = hex::encode(Sha256::digest(concatenated.as_bytes()));
        assert_eq!(entry.current_hash, expected);
    }

    #[test]
    fn test_hashed_fields_change_hash() {
        let entry = create_entry(GENESIS_PREVIOUS_HASH);

        let mut changed = entry.clone();
        changed.user_id = "user-43".to_string();
        assert!(!verify_entry_hash(&changed));

        let mut changed = entry.clone();
        changed.action = AuditAction::Deposit;
        assert!(!verify_entry_hash(&changed));

        let mut changed = entry.clone();
        changed.created_at += chrono::Duration::nanoseconds(1);
        assert!(!verify_entry_hash(&changed));

        let mut changed = entry.clone();
        changed.previous_hash = "x".to_string();
        assert!(!verify_entry_hash(&changed));
    }

    #[test]
    fn test_unhashed_fields_do_not_change_hash() {
        let mut entry = create_entry(GENESIS_PREVIOUS_HASH);
        entry.user_agent = "curl/8".to_string();
        entry.metadata.insert("note".into(), "x".into());
        entry.verification_status = VerificationStatus::Verified;
        entry.verified_at = Some(Utc::now());
        assert!(verify_entry_hash(&entry));
    }

    #[test]
    fn test_hash_format_check() {
        assert!(!is_hash_format(""));
        assert!(!is_hash_format(&"A".repeat(64)));
        assert!(is_hash_format(&"0f".repeat(32)));
    }
}
