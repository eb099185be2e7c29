//! Verification and reporting configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ComplianceError, ComplianceResult};

/// Configuration for the verifier and report generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Entries fetched per repository call during a scan
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// How the first entry of a verification window is linked
    #[serde(default)]
    pub window_anchor: WindowAnchor,

    /// Write `verified`/`tampered` back onto each scanned entry
    #[serde(default)]
    pub stamp_verification: bool,
}

/// Expected `previous_hash` of the first entry in a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// Expect the chain's genesis link (empty). A window that starts
    /// mid-chain reports its first entry as a broken link.
    #[default]
    ChainOrigin,

    /// Expect a known hash, e.g. the last entry of an already verified window
    Checkpoint(String),

    /// Skip the link check for the first entry
    Unanchored,
}

impl WindowAnchor {
    /// Link the first entry must carry, if any is checked
    pub fn expected_previous_hash(&self) -> Option<&str> {
        match self {
            WindowAnchor::ChainOrigin => Some(ledgerguard_audit::GENESIS_PREVIOUS_HASH),
            WindowAnchor::Checkpoint(hash) => Some(hash.as_str()),
            WindowAnchor::Unanchored => None,
        }
    }
}

fn default_page_size() -> usize {
    1_000
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            window_anchor: WindowAnchor::default(),
            stamp_verification: false,
        }
    }
}

impl ComplianceConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> ComplianceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ComplianceResult<()> {
        if self.page_size == 0 {
            return Err(ComplianceError::Config("page_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComplianceConfig::default();

        assert_eq!(config.page_size, 1_000);
        assert_eq!(config.window_anchor, WindowAnchor::ChainOrigin);
        assert!(!config.stamp_verification);
    }

    #[test]
    fn test_anchor_serialization() {
        let json = r#"{ "window_anchor": "unanchored" }"#;
        let config: ComplianceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window_anchor, WindowAnchor::Unanchored);

        let json = r#"{ "window_anchor": { "checkpoint": "abc" } }"#;
        let config: ComplianceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window_anchor, WindowAnchor::Checkpoint("abc".into()));
        assert_eq!(config.window_anchor.expected_previous_hash(), Some("abc"));
    }

    #[test]
    fn test_expected_previous_hash() {
        assert_eq!(WindowAnchor::ChainOrigin.expected_previous_hash(), Some(""));
        assert_eq!(WindowAnchor::Unanchored.expected_previous_hash(), None);
    }

    #[test]
    fn test_from_file_rejects_zero_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compliance.json");

        std::fs::write(&path, r#"{ "page_size": 0 }"#).unwrap();
        assert!(matches!(
            ComplianceConfig::from_file(&path),
            Err(ComplianceError::Config(_))
        ));

        std::fs::write(&path, r#"{ "page_size": 50, "stamp_verification": true }"#).unwrap();
        let config = ComplianceConfig::from_file(&path).unwrap();
        assert_eq!(config.page_size, 50);
        assert!(config.stamp_verification);
    }
}
