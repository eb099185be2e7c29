//! Card transaction lifecycle

use ledgerguard_core::EntityKind;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::machine::StatusMachine;

/// Status of a card authorization/settlement
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CardTransactionStatus {
    Pending,
    Completed,
    Declined,
    Reversed,
    Timeout,
}

impl StatusMachine for CardTransactionStatus {
    const KIND: EntityKind = EntityKind::CardTransaction;

    fn all() -> &'static [Self] {
        use CardTransactionStatus::*;
        &[Pending, Completed, Declined, Reversed, Timeout]
    }

    fn allowed_transitions(&self) -> &'static [Self] {
        use CardTransactionStatus::*;
        match self {
            Pending => &[Completed, Declined, Timeout],
            Timeout => &[Completed, Declined, Reversed],
            // refund edge
            Completed => &[Reversed],
            Declined | Reversed => &[],
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            CardTransactionStatus::Declined | CardTransactionStatus::Reversed
        )
    }
}
