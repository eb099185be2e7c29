//! LedgerGuard Audit - Hash-chained audit trail
//!
//! Every security-relevant or financial action is written as an
//! [`AuditLogEntry`] whose `current_hash` covers its own identity fields and
//! the `previous_hash` of the entry before it. Rewriting any committed entry
//! therefore requires recomputing every hash after it.
//!
//! ## Architecture
//!
//! ```text
//! domain service ──► AuditWriter::log ──┐
//!                                       │  lock: read head → hash → persist → advance head
//!                                       ▼
//!                              AuditRepository (append-only)
//!                              ├── InMemoryAuditRepository
//!                              └── JsonlAuditRepository
//! ```
//!
//! ## Key Components
//!
//! - [`config::AuditConfig`] - WORM switch, head source, timeouts
//! - [`entry::AuditLogEntry`] - Immutable persisted record
//! - [`event::AuditEvent`] - Typed payloads for known actions
//! - [`hash`] - Chain hash computation
//! - [`repository::AuditRepository`] - Storage boundary
//! - [`writer::AuditWriter`] - Serialized chain appender

pub mod config;
pub mod entry;
pub mod error;
pub mod event;
pub mod export;
pub mod hash;
pub mod memory;
pub mod repository;
pub mod store;
pub mod writer;

pub use config::{AuditConfig, HeadSource};
pub use entry::{AuditLogEntry, AuditRequest, Metadata, RequestOrigin, StatusTransitionLog};
pub use error::{AuditError, AuditResult};
pub use event::AuditEvent;
pub use export::{export_entries, write_export};
pub use hash::{calculate_entry_hash, verify_entry_hash, GENESIS_PREVIOUS_HASH};
pub use memory::InMemoryAuditRepository;
pub use repository::{AuditFilter, AuditPage, AuditRepository};
pub use store::JsonlAuditRepository;
pub use writer::AuditWriter;
