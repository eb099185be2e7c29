//! Verification status stamped on audit entries

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Integrity verdict for a single audit entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Written but not yet checked by the verifier
    #[default]
    Pending,
    /// Hash recomputed and matched
    Verified,
    /// Hash recomputed and did not match
    Tampered,
}
