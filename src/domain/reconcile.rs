use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::DonationStatus;

/// Why a reconciliation call changed nothing. These are expected, logged
/// outcomes of the idempotent contract, never errors: the webhook transport
/// must still acknowledge them to stop redelivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No donation carries this gateway reference (e.g. an orphaned intent).
    UnknownReference,
    /// The donation already reached a terminal state; duplicate or late
    /// notifications short-circuit here.
    AlreadyTerminal,
    /// The observed provider status is intermediate; the donation stays
    /// pending.
    NonTerminalStatus,
}

impl Display for IgnoreReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IgnoreReason::UnknownReference => "unknown reference",
            IgnoreReason::AlreadyTerminal => "already terminal",
            IgnoreReason::NonTerminalStatus => "non-terminal status",
        };
        f.write_str(s)
    }
}

/// Outcome of one reconciliation call. For any sequence of N deliveries of
/// the same terminal notification, exactly one call yields `Transitioned`
/// and the other N-1 yield `Ignored(AlreadyTerminal)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Transitioned { status: DonationStatus },
    Ignored { reason: IgnoreReason },
}

/// Reply to the synchronous client-confirmation entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub success: bool,
    pub status: DonationStatus,
}
