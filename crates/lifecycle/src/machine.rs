//! Status machine contract and kind-dispatched helpers

use std::fmt;
use std::str::FromStr;

use ledgerguard_core::EntityKind;

use crate::card::CardTransactionStatus;
use crate::deposit::DepositStatus;
use crate::error::TransitionError;
use crate::withdrawal::WithdrawalStatus;

/// Adjacency-table lifecycle for one entity kind
///
/// Implementors are closed enums; `allowed_transitions` is the authoritative
/// table. `is_terminal` is declared per kind rather than derived from an
/// empty table, since some "done" states keep a refund edge.
pub trait StatusMachine: Copy + Eq + fmt::Display + FromStr + 'static {
    /// Entity kind governed by this machine
    const KIND: EntityKind;

    /// Every declared status
    fn all() -> &'static [Self];

    /// Outgoing edges for this status
    fn allowed_transitions(&self) -> &'static [Self];

    /// Whether this status ends the forward flow
    fn is_terminal(&self) -> bool;

    /// Whether `s` names a declared status
    fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }

    /// Whether `to` is reachable from this status in one step
    fn can_transition_to(&self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Check a typed transition against the table
    fn validate_transition(&self, to: Self) -> Result<(), TransitionError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError::invalid_transition(
                Self::KIND,
                self.to_string(),
                to.to_string(),
            ))
        }
    }

    /// Check a transition between persisted status strings
    ///
    /// An unknown `to` is reported as an invalid status; an unknown `from`
    /// has no table entry and is reported as an invalid transition.
    fn validate_str(from: &str, to: &str) -> Result<(Self, Self), TransitionError> {
        let target = to
            .parse::<Self>()
            .map_err(|_| TransitionError::invalid_status(Self::KIND, from, to))?;
        let source = from
            .parse::<Self>()
            .map_err(|_| TransitionError::invalid_transition(Self::KIND, from, to))?;
        source.validate_transition(target)?;
        Ok((source, target))
    }
}

/// Validate a transition for an entity kind chosen at runtime
pub fn validate_transition(kind: EntityKind, from: &str, to: &str) -> Result<(), TransitionError> {
    match kind {
        EntityKind::Deposit => DepositStatus::validate_str(from, to).map(|_| ()),
        EntityKind::Withdrawal => WithdrawalStatus::validate_str(from, to).map(|_| ()),
        EntityKind::CardTransaction => CardTransactionStatus::validate_str(from, to).map(|_| ()),
    }
}

/// Table lookup for an entity kind chosen at runtime; unknown statuses yield false
pub fn can_transition(kind: EntityKind, from: &str, to: &str) -> bool {
    fn check<S: StatusMachine>(from: &str, to: &str) -> bool {
        match (from.parse::<S>(), to.parse::<S>()) {
            (Ok(from), Ok(to)) => from.can_transition_to(to),
            _ => false,
        }
    }

    match kind {
        EntityKind::Deposit => check::<DepositStatus>(from, to),
        EntityKind::Withdrawal => check::<WithdrawalStatus>(from, to),
        EntityKind::CardTransaction => check::<CardTransactionStatus>(from, to),
    }
}

/// Terminal check for a persisted status string; `None` if the status is unknown
pub fn is_terminal(kind: EntityKind, status: &str) -> Option<bool> {
    fn check<S: StatusMachine>(status: &str) -> Option<bool> {
        status.parse::<S>().ok().map(|s| s.is_terminal())
    }

    match kind {
        EntityKind::Deposit => check::<DepositStatus>(status),
        EntityKind::Withdrawal => check::<WithdrawalStatus>(status),
        EntityKind::CardTransaction => check::<CardTransactionStatus>(status),
    }
}

/// Whether `status` is a declared member of the kind's enumeration
pub fn is_valid_status(kind: EntityKind, status: &str) -> bool {
    match kind {
        EntityKind::Deposit => DepositStatus::is_valid(status),
        EntityKind::Withdrawal => WithdrawalStatus::is_valid(status),
        EntityKind::CardTransaction => CardTransactionStatus::is_valid(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_validate() {
        assert!(validate_transition(EntityKind::Deposit, "initiated", "pending").is_ok());
        assert!(validate_transition(EntityKind::Withdrawal, "pending", "alpaca_debited").is_ok());
        assert!(validate_transition(EntityKind::CardTransaction, "pending", "declined").is_ok());
    }

    #[test]
    fn test_unknown_target_is_invalid_status() {
        let err = validate_transition(EntityKind::Deposit, "pending", "settled").unwrap_err();
        assert!(matches!(err, TransitionError::InvalidStatus { .. }));
        assert_eq!(err.to_string(), "invalid deposit status: settled");
    }

    #[test]
    fn test_unknown_source_is_invalid_transition() {
        let err = validate_transition(EntityKind::Withdrawal, "bogus", "pending").unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition { .. }));
        assert_eq!(err.to_string(), "invalid status transition from bogus to pending");
    }

    #[test]
    fn test_can_transition_unknown_is_false() {
        assert!(!can_transition(EntityKind::Deposit, "bogus", "pending"));
        assert!(!can_transition(EntityKind::Deposit, "pending", "bogus"));
    }

    #[test]
    fn test_is_terminal_dispatch() {
        assert_eq!(is_terminal(EntityKind::Deposit, "broker_funded"), Some(true));
        assert_eq!(is_terminal(EntityKind::CardTransaction, "pending"), Some(false));
        assert_eq!(is_terminal(EntityKind::Withdrawal, "nope"), None);
    }

    #[test]
    fn test_is_valid_status() {
        assert!(is_valid_status(EntityKind::Withdrawal, "due_processing"));
        assert!(!is_valid_status(EntityKind::Deposit, "due_processing"));
        assert!(!is_valid_status(EntityKind::CardTransaction, "Pending"));
    }
}
