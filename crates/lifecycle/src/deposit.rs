//! Deposit lifecycle
//!
//! ```text
//! initiated ─► pending ─► confirmed ─► off_ramp_initiated ─► off_ramp_completed ─► broker_funded
//!                 │            ▲
//!                 ▼            │
//!              timeout ────────┘
//!
//! pending, timeout ─► expired
//! any non-terminal ─► failed
//! ```

use ledgerguard_core::EntityKind;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::machine::StatusMachine;

/// Status of an inbound deposit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    Initiated,
    Pending,
    Confirmed,
    OffRampInitiated,
    OffRampCompleted,
    BrokerFunded,
    Failed,
    Expired,
    Timeout,
}

impl StatusMachine for DepositStatus {
    const KIND: EntityKind = EntityKind::Deposit;

    fn all() -> &'static [Self] {
        use DepositStatus::*;
        &[
            Initiated,
            Pending,
            Confirmed,
            OffRampInitiated,
            OffRampCompleted,
            BrokerFunded,
            Failed,
            Expired,
            Timeout,
        ]
    }

    fn allowed_transitions(&self) -> &'static [Self] {
        use DepositStatus::*;
        match self {
            Initiated => &[Pending, Failed],
            Pending => &[Confirmed, Failed, Expired, Timeout],
            Timeout => &[Confirmed, Failed, Expired],
            Confirmed => &[OffRampInitiated, Failed],
            OffRampInitiated => &[OffRampCompleted, Failed],
            OffRampCompleted => &[BrokerFunded, Failed],
            BrokerFunded | Failed | Expired => &[],
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            DepositStatus::BrokerFunded | DepositStatus::Failed | DepositStatus::Expired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use DepositStatus::*;

    const EDGES: &[(DepositStatus, DepositStatus)] = &[
        (Initiated, Pending),
        (Initiated, Failed),
        (Pending, Confirmed),
        (Pending, Failed),
        (Pending, Expired),
        (Pending, Timeout),
        (Timeout, Confirmed),
        (Timeout, Failed),
        (Timeout, Expired),
        (Confirmed, OffRampInitiated),
        (Confirmed, Failed),
        (OffRampInitiated, OffRampCompleted),
        (OffRampInitiated, Failed),
        (OffRampCompleted, BrokerFunded),
        (OffRampCompleted, Failed),
    ];

    #[test]
    fn test_table_matches_every_pair() {
        for from in DepositStatus::iter() {
            for to in DepositStatus::iter() {
                let expected = EDGES.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "deposit {} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_timeout_resumes_at_confirmed_not_pending() {
        assert!(Timeout.validate_transition(Confirmed).is_ok());
        assert!(Timeout.validate_transition(Pending).is_err());
        assert!(Pending.validate_transition(Expired).is_ok());
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(DepositStatus::all().len(), DepositStatus::iter().count());
    }

    #[test]
    fn test_terminal_coincides_with_empty_table() {
        for status in DepositStatus::iter() {
            assert_eq!(
                status.is_terminal(),
                status.allowed_transitions().is_empty(),
                "{}",
                status
            );
        }
        assert!(BrokerFunded.is_terminal());
        assert!(Failed.is_terminal());
        assert!(Expired.is_terminal());
    }

    #[test]
    fn test_happy_path() {
        let path = [
            Initiated,
            Pending,
            Confirmed,
            OffRampInitiated,
            OffRampCompleted,
            BrokerFunded,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].validate_transition(pair[1]).is_ok());
        }
    }

    #[test]
    fn test_skip_off_ramp_rejected() {
        let err = Confirmed.validate_transition(BrokerFunded).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid status transition from confirmed to broker_funded"
        );
        assert_eq!(err.entity_kind(), EntityKind::Deposit);
    }

    #[test]
    fn test_timeout_recovers() {
        assert!(Pending.validate_transition(Timeout).is_ok());
        assert!(Timeout.validate_transition(Confirmed).is_ok());
        assert!(Timeout.validate_transition(Pending).is_err());
    }

    #[test]
    fn test_persisted_form() {
        assert_eq!(OffRampInitiated.to_string(), "off_ramp_initiated");
        assert_eq!(
            serde_json::to_string(&BrokerFunded).unwrap(),
            "\"broker_funded\""
        );
        assert_eq!(
            DepositStatus::validate_str("off_ramp_completed", "broker_funded").unwrap(),
            (OffRampCompleted, BrokerFunded)
        );
    }
}
