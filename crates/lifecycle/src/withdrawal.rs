//! Withdrawal lifecycle
//!
//! Funds leave the brokerage account (`alpaca_debited`), go through payout
//! processing (`due_processing`) and are sent on-chain. Failures after the
//! debit can be `reversed` back to the user.

use ledgerguard_core::EntityKind;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::machine::StatusMachine;

/// Status of an outbound withdrawal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Initiated,
    Pending,
    AlpacaDebited,
    DueProcessing,
    OnchainTransfer,
    Completed,
    Failed,
    Reversed,
    Timeout,
}

impl StatusMachine for WithdrawalStatus {
    const KIND: EntityKind = EntityKind::Withdrawal;

    fn all() -> &'static [Self] {
        use WithdrawalStatus::*;
        &[
            Initiated,
            Pending,
            AlpacaDebited,
            DueProcessing,
            OnchainTransfer,
            Completed,
            Failed,
            Reversed,
            Timeout,
        ]
    }

    fn allowed_transitions(&self) -> &'static [Self] {
        use WithdrawalStatus::*;
        match self {
            Initiated => &[Pending, Failed],
            Pending => &[AlpacaDebited, Failed, Timeout],
            AlpacaDebited => &[DueProcessing, Failed, Reversed],
            DueProcessing => &[OnchainTransfer, Failed, Timeout, Reversed],
            OnchainTransfer => &[Completed, Failed, Timeout],
            Timeout => &[Completed, Failed, Reversed],
            Completed => &[],
            Failed => &[Reversed],
            Reversed => &[],
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, WithdrawalStatus::Completed | WithdrawalStatus::Reversed)
    }
}
