//! Entity kinds and transition trigger sources

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Money-movement entities whose status column is governed by a lifecycle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Deposit,
    Withdrawal,
    CardTransaction,
}

impl EntityKind {
    /// Human label used in error messages ("card transaction")
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Deposit => "deposit",
            EntityKind::Withdrawal => "withdrawal",
            EntityKind::CardTransaction => "card transaction",
        }
    }
}

/// What caused a status transition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// Provider callback (payment processor, card network)
    Webhook,
    /// Explicit user request
    User,
    /// Internal service decision
    System,
    /// Background job (timeouts, expiries)
    Scheduler,
}
