//! Typed audit payloads
//!
//! Known actions carry a fixed metadata shape. Anything else goes through
//! [`AuditEvent::Custom`] with an open payload.

use ledgerguard_core::AuditAction;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::entry::{AuditRequest, Metadata, RequestOrigin, StatusTransitionLog};

/// An auditable event with its action-specific payload
#[derive(Debug, Clone)]
pub enum AuditEvent {
    Deposit {
        deposit_id: String,
        amount: Decimal,
        currency: String,
        status: String,
    },

    Withdrawal {
        withdrawal_id: String,
        amount: Decimal,
        currency: String,
        destination: String,
        status: String,
    },

    StatusTransition(StatusTransitionLog),

    Trade {
        order_id: String,
        symbol: String,
        side: String,
        quantity: Decimal,
        price: Decimal,
    },

    Login {
        success: bool,
        method: String,
        failure_reason: Option<String>,
    },

    Logout,

    ApiKeyCreate {
        key_id: String,
        key_name: String,
        scopes: Vec<String>,
    },

    ApiKeyRevoke {
        key_id: String,
        reason: String,
    },

    PasswordChange,

    MfaEnable {
        method: String,
    },

    MfaDisable {
        method: String,
    },

    AdminAction {
        operation: String,
        target_user_id: String,
        details: Metadata,
    },

    Custom {
        action: AuditAction,
        resource: String,
        resource_id: Option<String>,
        metadata: Metadata,
    },
}

impl AuditEvent {
    /// Action this event is recorded under
    pub fn action(&self) -> AuditAction {
        match self {
            AuditEvent::Deposit { .. } => AuditAction::Deposit,
            AuditEvent::Withdrawal { .. } => AuditAction::Withdrawal,
            AuditEvent::StatusTransition(_) => AuditAction::StatusTransition,
            AuditEvent::Trade { .. } => AuditAction::Trade,
            AuditEvent::Login { .. } => AuditAction::Login,
            AuditEvent::Logout => AuditAction::Logout,
            AuditEvent::ApiKeyCreate { .. } => AuditAction::ApiKeyCreate,
            AuditEvent::ApiKeyRevoke { .. } => AuditAction::ApiKeyRevoke,
            AuditEvent::PasswordChange => AuditAction::PasswordChange,
            AuditEvent::MfaEnable { .. } => AuditAction::MfaEnable,
            AuditEvent::MfaDisable { .. } => AuditAction::MfaDisable,
            AuditEvent::AdminAction { .. } => AuditAction::AdminAction,
            AuditEvent::Custom { action, .. } => *action,
        }
    }

    /// Flatten into a writer request for `user_id`
    pub fn into_request(self, user_id: impl Into<String>, origin: RequestOrigin) -> AuditRequest {
        let action = self.action();
        let (resource, resource_id, metadata) = self.into_parts();

        let mut request = AuditRequest::new(user_id, action, resource)
            .with_origin(origin)
            .with_metadata(metadata);
        request.resource_id = resource_id;
        request
    }

    fn into_parts(self) -> (String, Option<String>, Metadata) {
        let mut meta = Metadata::new();

        match self {
            AuditEvent::Deposit {
                deposit_id,
                amount,
                currency,
                status,
            } => {
                meta.insert("amount".into(), Value::String(amount.to_string()));
                meta.insert("currency".into(), Value::String(currency));
                meta.insert("status".into(), Value::String(status));
                ("deposits".into(), Some(deposit_id), meta)
            }

            AuditEvent::Withdrawal {
                withdrawal_id,
                amount,
                currency,
                destination,
                status,
            } => {
                meta.insert("amount".into(), Value::String(amount.to_string()));
                meta.insert("currency".into(), Value::String(currency));
                meta.insert("destination".into(), Value::String(destination));
                meta.insert("status".into(), Value::String(status));
                ("withdrawals".into(), Some(withdrawal_id), meta)
            }

            AuditEvent::StatusTransition(log) => {
                // fixed keys win over caller-supplied extras
                meta.extend(log.metadata);
                meta.insert("entity_id".into(), Value::String(log.entity_id.clone()));
                meta.insert("entity_type".into(), Value::String(log.entity_type.to_string()));
                meta.insert("from_status".into(), Value::String(log.from_status));
                meta.insert("to_status".into(), Value::String(log.to_status));
                meta.insert("trigger".into(), Value::String(log.trigger.to_string()));
                meta.insert("transitioned_at".into(), Value::String(log.timestamp.to_rfc3339()));
                (log.entity_type.to_string(), Some(log.entity_id), meta)
            }

            AuditEvent::Trade {
                order_id,
                symbol,
                side,
                quantity,
                price,
            } => {
                meta.insert("symbol".into(), Value::String(symbol));
                meta.insert("side".into(), Value::String(side));
                meta.insert("quantity".into(), Value::String(quantity.to_string()));
                meta.insert("price".into(), Value::String(price.to_string()));
                ("orders".into(), Some(order_id), meta)
            }

            AuditEvent::Login {
                success,
                method,
                failure_reason,
            } => {
                let status = if success { "success" } else { "failed" };
                meta.insert("status".into(), Value::String(status.into()));
                meta.insert("method".into(), Value::String(method));
                if let Some(reason) = failure_reason {
                    meta.insert("failure_reason".into(), Value::String(reason));
                }
                ("session".into(), None, meta)
            }

            AuditEvent::Logout => ("session".into(), None, meta),

            AuditEvent::ApiKeyCreate {
                key_id,
                key_name,
                scopes,
            } => {
                meta.insert("key_name".into(), Value::String(key_name));
                meta.insert(
                    "scopes".into(),
                    Value::Array(scopes.into_iter().map(Value::String).collect()),
                );
                ("api_keys".into(), Some(key_id), meta)
            }

            AuditEvent::ApiKeyRevoke { key_id, reason } => {
                meta.insert("reason".into(), Value::String(reason));
                ("api_keys".into(), Some(key_id), meta)
            }

            AuditEvent::PasswordChange => ("credentials".into(), None, meta),

            AuditEvent::MfaEnable { method } | AuditEvent::MfaDisable { method } => {
                meta.insert("method".into(), Value::String(method));
                ("mfa".into(), None, meta)
            }

            AuditEvent::AdminAction {
                operation,
                target_user_id,
                details,
            } => {
                meta.insert("operation".into(), Value::String(operation));
                meta.insert("details".into(), Value::Object(details.into_iter().collect()));
                ("admin".into(), Some(target_user_id), meta)
            }

            AuditEvent::Custom {
                resource,
                resource_id,
                metadata,
                ..
            } => (resource, resource_id, metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerguard_core::TriggerSource;
    use ledgerguard_lifecycle::CardTransactionStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deposit_shape() {
        let event = AuditEvent::Deposit {
            deposit_id: "dep-7".into(),
            amount: dec!(250.50),
            currency: "USDC".into(),
            status: "pending".into(),
        };
        let request = event.into_request("user-1", RequestOrigin::default());

        assert_eq!(request.action, AuditAction::Deposit);
        assert_eq!(request.resource, "deposits");
        assert_eq!(request.resource_id.as_deref(), Some("dep-7"));
        assert_eq!(request.metadata["amount"], "250.50");
        assert_eq!(request.metadata["currency"], "USDC");
    }

    #[test]
    fn test_failed_login_carries_status() {
        let event = AuditEvent::Login {
            success: false,
            method: "password".into(),
            failure_reason: Some("bad_password".into()),
        };
        let request = event.into_request("user-1", RequestOrigin::new("10.1.1.1", "web"));

        assert_eq!(request.action, AuditAction::Login);
        assert_eq!(request.metadata["status"], "failed");
        assert_eq!(request.metadata["failure_reason"], "bad_password");
        assert_eq!(request.origin.ip_address, "10.1.1.1");
    }

    #[test]
    fn test_status_transition_fixed_keys_win() {
        let log = StatusTransitionLog::checked(
            "card-tx-1",
            CardTransactionStatus::Pending,
            CardTransactionStatus::Completed,
            TriggerSource::Webhook,
        )
        .unwrap()
        .with_meta("to_status", "spoofed")
        .with_meta("network_ref", "visa-123");

        let request = AuditEvent::StatusTransition(log).into_request("system", RequestOrigin::internal());

        assert_eq!(request.action, AuditAction::StatusTransition);
        assert_eq!(request.resource, "card_transaction");
        assert_eq!(request.resource_id.as_deref(), Some("card-tx-1"));
        assert_eq!(request.metadata["to_status"], "completed");
        assert_eq!(request.metadata["trigger"], "webhook");
        assert_eq!(request.metadata["network_ref"], "visa-123");
    }

    #[test]
    fn test_api_key_scopes_are_array() {
        let request = AuditEvent::ApiKeyCreate {
            key_id: "key-1".into(),
            key_name: "ci".into(),
            scopes: vec!["read".into(), "trade".into()],
        }
        .into_request("user-1", RequestOrigin::default());

        assert_eq!(request.metadata["scopes"], serde_json::json!(["read", "trade"]));
        assert!(request.action.is_permission_change());
    }

    #[test]
    fn test_custom_passthrough() {
        let mut metadata = Metadata::new();
        metadata.insert("format".into(), "csv".into());

        let request = AuditEvent::Custom {
            action: AuditAction::DataExport,
            resource: "statements".into(),
            resource_id: Some("2024-Q4".into()),
            metadata,
        }
        .into_request("user-9", RequestOrigin::default());

        assert_eq!(request.action, AuditAction::DataExport);
        assert_eq!(request.resource, "statements");
        assert_eq!(request.metadata["format"], "csv");
    }
}
