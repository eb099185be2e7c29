//! JSONL audit repository - append-only files
//!
//! Layout under the base directory:
//! - `audit.jsonl`: one entry per line, never rewritten
//! - `verifications.jsonl`: verification stamps, applied over entries on open
//!
//! Both files are opened in append mode; stamps are journaled rather than
//! written back into `audit.jsonl`.
//!
//! Each file tracks its committed length. Bytes past it belong to an append
//! that failed or was abandoned (timeout) and are truncated before the next
//! append, so a failed write never surfaces on replay. File I/O runs on the
//! blocking pool so callers' deadlines can fire.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerguard_core::VerificationStatus;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::entry::AuditLogEntry;
use crate::error::{AuditError, AuditResult};
use crate::memory::EntryLog;
use crate::repository::{AuditFilter, AuditRepository};

const ENTRIES_FILE: &str = "audit.jsonl";
const STAMPS_FILE: &str = "verifications.jsonl";

/// A journaled verification verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VerificationStamp {
    id: Uuid,
    status: VerificationStatus,
    verified_at: DateTime<Utc>,
}

/// Append-only file with the length of its last successful append
struct JournalFile {
    file: Arc<StdMutex<File>>,
    committed_len: u64,
}

impl JournalFile {
    fn open(path: &Path) -> AuditResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let committed_len = file.metadata()?.len();
        Ok(Self {
            file: Arc::new(StdMutex::new(file)),
            committed_len,
        })
    }

    /// Append one JSON line; `committed_len` advances only on success
    async fn append<T: Serialize>(&mut self, record: &T) -> AuditResult<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let file = Arc::clone(&self.file);
        let committed = self.committed_len;
        let new_len = tokio::task::spawn_blocking(move || -> AuditResult<u64> {
            let file = file
                .lock()
                .map_err(|_| AuditError::Storage("journal file lock poisoned".into()))?;
            Ok(append_line(&file, committed, &line)?)
        })
        .await
        .map_err(|e| AuditError::Storage(format!("journal append task failed: {}", e)))??;

        self.committed_len = new_len;
        Ok(())
    }
}

/// Truncate to `committed`, append `line`, and roll back on failure
///
/// Returns the new committed length.
fn append_line(mut file: &File, committed: u64, line: &[u8]) -> io::Result<u64> {
    let on_disk = file.metadata()?.len();
    if on_disk != committed {
        tracing::warn!(
            committed,
            on_disk,
            "Discarding uncommitted bytes from journal tail"
        );
        file.set_len(committed)?;
    }

    if let Err(e) = file.write_all(line) {
        if let Err(rollback) = file.set_len(committed) {
            tracing::error!(error = %rollback, "Journal rollback failed; retrying on next append");
        }
        return Err(e);
    }

    Ok(committed + line.len() as u64)
}

struct StoreInner {
    log: EntryLog,
    entries: JournalFile,
    stamps: JournalFile,
}

/// File-backed append-only audit store
pub struct JsonlAuditRepository {
    base_path: PathBuf,
    inner: Mutex<StoreInner>,
}

impl JsonlAuditRepository {
    /// Open (or create) a store in `base_path`, replaying existing files
    pub fn open(base_path: impl AsRef<Path>) -> AuditResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let entries_path = base_path.join(ENTRIES_FILE);
        let stamps_path = base_path.join(STAMPS_FILE);

        let mut log = EntryLog::default();
        for entry in read_lines::<AuditLogEntry>(&entries_path)? {
            log.push(entry)?;
        }

        let mut applied = 0usize;
        for stamp in read_lines::<VerificationStamp>(&stamps_path)? {
            match log.stamp(stamp.id, stamp.status, stamp.verified_at) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!(id = %stamp.id, error = %e, "Skipping orphan verification stamp"),
            }
        }

        tracing::debug!(
            path = %base_path.display(),
            entries = log.len(),
            stamps = applied,
            "Opened JSONL audit store"
        );

        Ok(Self {
            inner: Mutex::new(StoreInner {
                log,
                entries: JournalFile::open(&entries_path)?,
                stamps: JournalFile::open(&stamps_path)?,
            }),
            base_path,
        })
    }

    /// Directory holding the store files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the entry file
    pub fn entries_path(&self) -> PathBuf {
        self.base_path.join(ENTRIES_FILE)
    }
}

#[async_trait]
impl AuditRepository for JsonlAuditRepository {
    async fn create(&self, entry: &AuditLogEntry) -> AuditResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.log.contains(&entry.id) {
            return Err(AuditError::DuplicateEntry(entry.id));
        }

        inner.entries.append(entry).await?;
        inner.log.push(entry.clone())
    }

    async fn list(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditLogEntry>> {
        filter.validate()?;
        Ok(self.inner.lock().await.log.list(filter))
    }

    async fn count(&self, filter: &AuditFilter) -> AuditResult<u64> {
        filter.validate()?;
        Ok(self.inner.lock().await.log.count(filter))
    }

    async fn last_entry(&self) -> AuditResult<Option<AuditLogEntry>> {
        Ok(self.inner.lock().await.log.last().cloned())
    }

    async fn stamp_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        verified_at: DateTime<Utc>,
    ) -> AuditResult<()> {
        let mut inner = self.inner.lock().await;
        if !inner.log.contains(&id) {
            return Err(AuditError::EntryNotFound(id));
        }

        let stamp = VerificationStamp {
            id,
            status,
            verified_at,
        };
        inner.stamps.append(&stamp).await?;
        inner.log.stamp(id, status, verified_at)
    }
}

fn read_lines<T: serde::de::DeserializeOwned>(path: &Path) -> AuditResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|e| {
            AuditError::Storage(format!("{} line {}: {}", path.display(), i + 1, e))
        })?;
        items.push(item);
    }

    Ok(items)
}
