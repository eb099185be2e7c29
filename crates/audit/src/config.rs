//! Audit writer configuration
//!
//! Passed to the writer at construction. Nothing here can be toggled on a
//! live writer.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{AuditError, AuditResult};

/// Configuration for the audit writer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Chain entries (compute previous/current hash). Disabled entries carry
    /// empty hashes and fail verification.
    #[serde(default = "default_worm_enabled")]
    pub worm_enabled: bool,

    /// Where the writer takes the chain head from before each append
    #[serde(default)]
    pub head_source: HeadSource,

    /// Upper bound for a single repository call (in milliseconds)
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,

    /// Largest page a read may return
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

/// Source of the chain head used as the next `previous_hash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeadSource {
    /// Re-read the last persisted entry under the writer lock (DEFAULT).
    /// Survives restarts and other writers sharing the repository.
    #[default]
    Repository,

    /// Seed once from the repository at open, then track in process.
    /// Only valid with a single writer per repository.
    InProcess,
}

fn default_worm_enabled() -> bool {
    true
}

fn default_write_timeout_ms() -> u64 {
    5_000
}

fn default_max_page_size() -> usize {
    1_000
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            worm_enabled: default_worm_enabled(),
            head_source: HeadSource::default(),
            write_timeout_ms: default_write_timeout_ms(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl AuditConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> AuditResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AuditResult<()> {
        if self.max_page_size == 0 {
            return Err(AuditError::Config("max_page_size must be positive".into()));
        }
        if self.write_timeout_ms == 0 {
            return Err(AuditError::Config("write_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Get write timeout as Duration
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Clamp a requested page size; zero means "as large as allowed"
    pub fn clamp_limit(&self, limit: usize) -> usize {
        if limit == 0 {
            self.max_page_size
        } else {
            limit.min(self.max_page_size)
        }
    }
}
