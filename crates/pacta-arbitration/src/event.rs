//! # Arbitration Events
//!
//! Typed notifications emitted on every successful arbitration state
//! change, carrying the acting principal, the affected amount where funds
//! moved, and a UTC timestamp. Off-core observers consume these; they
//! never poll the manager's storage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pacta_core::{ContractId, DisputeId, PrincipalId};

/// A successful arbitration state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArbitrationEvent {
    /// A dispute was recorded. `escrow_frozen` reports whether the
    /// best-effort freeze of the target escrow landed; filing succeeds
    /// either way.
    DisputeFiled {
        dispute_id: DisputeId,
        contract_id: ContractId,
        plaintiff: PrincipalId,
        defendant: PrincipalId,
        actor: PrincipalId,
        escrow_frozen: bool,
        at: DateTime<Utc>,
    },

    /// A dispute was resolved with a binary outcome. `amount` is the
    /// balance that moved out of custody as a consequence.
    DisputeResolved {
        dispute_id: DisputeId,
        contract_id: ContractId,
        favor_beneficiary: bool,
        actor: PrincipalId,
        amount: Option<Decimal>,
        at: DateTime<Utc>,
    },

    /// The authorized arbiter was reassigned. The new arbiter gains
    /// resolution authority immediately; the old one loses it. Resolved
    /// disputes are never retroactively altered.
    ArbiterChanged {
        previous: PrincipalId,
        new_arbiter: PrincipalId,
        actor: PrincipalId,
        at: DateTime<Utc>,
    },

    /// Manager ownership moved to a new principal.
    OwnershipTransferred {
        previous: PrincipalId,
        new_owner: PrincipalId,
        actor: PrincipalId,
        at: DateTime<Utc>,
    },
}

impl ArbitrationEvent {
    /// The canonical kind string of this event, stable for observers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DisputeFiled { .. } => "arbitration.dispute.filed.v1",
            Self::DisputeResolved { .. } => "arbitration.dispute.resolved.v1",
            Self::ArbiterChanged { .. } => "arbitration.arbiter.changed.v1",
            Self::OwnershipTransferred { .. } => "arbitration.ownership.transferred.v1",
        }
    }
}

impl std::fmt::Display for ArbitrationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
