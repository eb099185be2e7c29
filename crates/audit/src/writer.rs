//! Audit Writer - Serialized hash-chain appender
//!
//! One lock guards the whole "read head → build entry → persist → advance
//! head" sequence. Two concurrent writers can therefore never both link to
//! the same predecessor.
//!
//! Audit writes are not transactional with the business change they
//! describe: a failed write is logged and returned, and the caller decides
//! what to do. The financial operation is not rolled back here.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use ledgerguard_core::{TriggerSource, VerificationStatus};
use ledgerguard_lifecycle::StatusMachine;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{AuditConfig, HeadSource};
use crate::entry::{AuditLogEntry, AuditRequest, Metadata, RequestOrigin, StatusTransitionLog};
use crate::error::{AuditError, AuditResult};
use crate::event::AuditEvent;
use crate::export::export_entries;
use crate::hash::{calculate_entry_hash, GENESIS_PREVIOUS_HASH};
use crate::repository::{AuditFilter, AuditPage, AuditRepository};

/// Hash-chained audit writer
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct AuditWriter {
    repository: Arc<dyn AuditRepository>,
    config: AuditConfig,
    /// Chain head; also the writer's critical-section lock
    head: Mutex<String>,
}

impl AuditWriter {
    /// Open a writer, seeding the chain head from the last persisted entry
    pub async fn open(repository: Arc<dyn AuditRepository>, config: AuditConfig) -> AuditResult<Self> {
        let head = Self::with_deadline(&config, Self::load_head(repository.as_ref())).await?;
        tracing::debug!(head = %head, worm = config.worm_enabled, "Audit writer opened");

        Ok(Self {
            repository,
            config,
            head: Mutex::new(head),
        })
    }

    /// Writer over a fresh in-memory repository (for testing)
    pub async fn in_memory() -> AuditResult<Self> {
        Self::open(
            Arc::new(crate::memory::InMemoryAuditRepository::new()),
            AuditConfig::default(),
        )
        .await
    }

    /// Record an action
    ///
    /// Returns the persisted entry. On failure the chain head is unchanged.
    pub async fn log(&self, request: AuditRequest) -> AuditResult<AuditLogEntry> {
        let mut head = self.head.lock().await;

        if self.config.worm_enabled && self.config.head_source == HeadSource::Repository {
            *head = self.deadline(Self::load_head(self.repository.as_ref())).await?;
        }

        let mut entry = AuditLogEntry {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            action: request.action,
            resource: request.resource,
            resource_id: request.resource_id,
            ip_address: request.origin.ip_address,
            user_agent: request.origin.user_agent,
            metadata: request.metadata,
            created_at: Utc::now(),
            previous_hash: String::new(),
            current_hash: String::new(),
            verified_at: None,
            verification_status: VerificationStatus::Pending,
        };

        if self.config.worm_enabled {
            entry.previous_hash = head.clone();
            entry.current_hash = calculate_entry_hash(&entry);
        }

        if let Err(e) = self.deadline(self.repository.create(&entry)).await {
            tracing::error!(
                entry_id = %entry.id,
                action = %entry.action,
                user_id = %entry.user_id,
                error = %e,
                "Audit write failed; chain head unchanged"
            );
            return Err(e);
        }

        if self.config.worm_enabled {
            *head = entry.current_hash.clone();
        }

        tracing::debug!(
            entry_id = %entry.id,
            action = %entry.action,
            hash = %entry.current_hash,
            "Audit entry committed"
        );

        Ok(entry)
    }

    /// Record a typed event
    pub async fn log_event(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        event: AuditEvent,
    ) -> AuditResult<AuditLogEntry> {
        self.log(event.into_request(user_id, origin.clone())).await
    }

    pub async fn log_deposit(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        deposit_id: &str,
        amount: Decimal,
        currency: &str,
        status: &str,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::Deposit {
            deposit_id: deposit_id.to_string(),
            amount,
            currency: currency.to_string(),
            status: status.to_string(),
        };
        self.log_event(user_id, origin, event).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn log_withdrawal(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        withdrawal_id: &str,
        amount: Decimal,
        currency: &str,
        destination: &str,
        status: &str,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::Withdrawal {
            withdrawal_id: withdrawal_id.to_string(),
            amount,
            currency: currency.to_string(),
            destination: destination.to_string(),
            status: status.to_string(),
        };
        self.log_event(user_id, origin, event).await
    }

    /// Record an already-validated status transition
    pub async fn log_status_transition(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        transition: StatusTransitionLog,
    ) -> AuditResult<AuditLogEntry> {
        self.log_event(user_id, origin, AuditEvent::StatusTransition(transition))
            .await
    }

    /// Validate `from → to` against the entity's lifecycle and record it
    ///
    /// Nothing is written if the lifecycle rejects the transition.
    pub async fn record_transition<S: StatusMachine>(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        entity_id: &str,
        from: S,
        to: S,
        trigger: TriggerSource,
    ) -> AuditResult<AuditLogEntry> {
        let transition = StatusTransitionLog::checked(entity_id, from, to, trigger)?;
        self.log_status_transition(user_id, origin, transition).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn log_trade(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        order_id: &str,
        symbol: &str,
        side: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::Trade {
            order_id: order_id.to_string(),
            symbol: symbol.to_string(),
            side: side.to_string(),
            quantity,
            price,
        };
        self.log_event(user_id, origin, event).await
    }

    /// Record a login attempt; failed attempts carry `status = "failed"`
    pub async fn log_login(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        success: bool,
        method: &str,
        failure_reason: Option<&str>,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::Login {
            success,
            method: method.to_string(),
            failure_reason: failure_reason.map(str::to_string),
        };
        self.log_event(user_id, origin, event).await
    }

    pub async fn log_logout(&self, user_id: &str, origin: &RequestOrigin) -> AuditResult<AuditLogEntry> {
        self.log_event(user_id, origin, AuditEvent::Logout).await
    }

    pub async fn log_api_key_create(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        key_id: &str,
        key_name: &str,
        scopes: &[&str],
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::ApiKeyCreate {
            key_id: key_id.to_string(),
            key_name: key_name.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        };
        self.log_event(user_id, origin, event).await
    }

    pub async fn log_api_key_revoke(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        key_id: &str,
        reason: &str,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::ApiKeyRevoke {
            key_id: key_id.to_string(),
            reason: reason.to_string(),
        };
        self.log_event(user_id, origin, event).await
    }

    pub async fn log_password_change(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
    ) -> AuditResult<AuditLogEntry> {
        self.log_event(user_id, origin, AuditEvent::PasswordChange).await
    }

    pub async fn log_mfa_enable(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        method: &str,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::MfaEnable {
            method: method.to_string(),
        };
        self.log_event(user_id, origin, event).await
    }

    pub async fn log_mfa_disable(
        &self,
        user_id: &str,
        origin: &RequestOrigin,
        method: &str,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::MfaDisable {
            method: method.to_string(),
        };
        self.log_event(user_id, origin, event).await
    }

    /// Record an operator action against another user
    pub async fn log_admin_action(
        &self,
        admin_id: &str,
        origin: &RequestOrigin,
        operation: &str,
        target_user_id: &str,
        details: Metadata,
    ) -> AuditResult<AuditLogEntry> {
        let event = AuditEvent::AdminAction {
            operation: operation.to_string(),
            target_user_id: target_user_id.to_string(),
            details,
        };
        self.log_event(admin_id, origin, event).await
    }

    /// One page of a user's entries with the total count
    pub async fn get_user_audit_logs(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> AuditResult<AuditPage> {
        self.get_audit_logs(AuditFilter::for_user(user_id).page(limit, offset))
            .await
    }

    /// One page of entries matching `filter` with the total count
    pub async fn get_audit_logs(&self, mut filter: AuditFilter) -> AuditResult<AuditPage> {
        filter.limit = self.config.clamp_limit(filter.limit);

        let entries = self.deadline(self.repository.list(&filter)).await?;
        let total = self.deadline(self.repository.count(&filter)).await?;

        Ok(AuditPage {
            entries,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }

    /// Every entry matching `filter`, fetched page by page
    ///
    /// `limit == 0` means no limit. Pages never exceed `max_page_size`.
    pub async fn collect_audit_logs(&self, filter: AuditFilter) -> AuditResult<Vec<AuditLogEntry>> {
        let page_size = self.config.max_page_size.max(1);
        let wanted = if filter.limit == 0 { usize::MAX } else { filter.limit };

        let mut entries = Vec::new();
        let mut page = filter;
        loop {
            page.limit = page_size.min(wanted - entries.len());
            let batch = self.deadline(self.repository.list(&page)).await?;
            let fetched = batch.len();
            entries.extend(batch);

            if fetched < page.limit || entries.len() >= wanted {
                break;
            }
            page.offset += fetched;
        }

        Ok(entries)
    }

    /// Serialize the entries matching `filter` as an indented JSON array
    ///
    /// Unlike [`get_audit_logs`](Self::get_audit_logs) this is not capped at
    /// one page; `limit == 0` exports every match.
    pub async fn export_audit_logs(&self, filter: AuditFilter) -> AuditResult<String> {
        let user_id = filter.user_id.clone();
        let entries = self.collect_audit_logs(filter).await?;

        tracing::info!(
            count = entries.len(),
            user_id = ?user_id,
            "Exporting audit entries"
        );
        export_entries(&entries)
    }

    /// Hash the next entry will link to
    pub async fn chain_head(&self) -> String {
        self.head.lock().await.clone()
    }

    /// Underlying repository (shared with verifiers/reporters)
    pub fn repository(&self) -> Arc<dyn AuditRepository> {
        Arc::clone(&self.repository)
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    async fn load_head(repository: &dyn AuditRepository) -> AuditResult<String> {
        Ok(repository
            .last_entry()
            .await?
            .map(|e| e.current_hash)
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string()))
    }

    async fn deadline<T>(&self, fut: impl Future<Output = AuditResult<T>>) -> AuditResult<T> {
        Self::with_deadline(&self.config, fut).await
    }

    async fn with_deadline<T>(
        config: &AuditConfig,
        fut: impl Future<Output = AuditResult<T>>,
    ) -> AuditResult<T> {
        match tokio::time::timeout(config.write_timeout(), fut).await {
            Ok(result) => result,
            Err(_) => Err(AuditError::Timeout(config.write_timeout_ms)),
        }
    }
}
