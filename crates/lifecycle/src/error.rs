//! Transition errors

use ledgerguard_core::EntityKind;
use thiserror::Error;

/// A requested status change that the lifecycle does not allow
///
/// Non-retryable: the caller asked for something structurally illegal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        entity_kind: EntityKind,
        from: String,
        to: String,
    },

    #[error("invalid {} status: {to}", .entity_kind.label())]
    InvalidStatus {
        entity_kind: EntityKind,
        from: String,
        to: String,
    },
}

impl TransitionError {
    pub fn invalid_transition(
        entity_kind: EntityKind,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        TransitionError::InvalidTransition {
            entity_kind,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn invalid_status(
        entity_kind: EntityKind,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        TransitionError::InvalidStatus {
            entity_kind,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            TransitionError::InvalidTransition { entity_kind, .. }
            | TransitionError::InvalidStatus { entity_kind, .. } => *entity_kind,
        }
    }

    pub fn from_status(&self) -> &str {
        match self {
            TransitionError::InvalidTransition { from, .. }
            | TransitionError::InvalidStatus { from, .. } => from,
        }
    }

    pub fn to_status(&self) -> &str {
        match self {
            TransitionError::InvalidTransition { to, .. }
            | TransitionError::InvalidStatus { to, .. } => to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = TransitionError::invalid_transition(EntityKind::Deposit, "confirmed", "broker_funded");
        assert_eq!(
            err.to_string(),
            "invalid status transition from confirmed to broker_funded"
        );
        assert_eq!(err.entity_kind(), EntityKind::Deposit);
        assert_eq!(err.from_status(), "confirmed");
        assert_eq!(err.to_status(), "broker_funded");
    }

    #[test]
    fn test_invalid_status_message() {
        let err = TransitionError::invalid_status(EntityKind::CardTransaction, "pending", "settled");
        assert_eq!(err.to_string(), "invalid card transaction status: settled");
    }
}
