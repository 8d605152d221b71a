//! # Custody Events
//!
//! Typed notifications emitted on every successful custody state change.
//! Each event carries the acting principal, the affected amount where
//! relevant, and a UTC timestamp. These events are the sole channel through
//! which off-core observers (audit logs, the notification service,
//! dashboards) learn of custody changes — observers never poll internal
//! storage.
//!
//! Mutating operations return the event they produced, and each escrow
//! additionally appends its events to its own log as a tamper-evident
//! audit trail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pacta_core::{ContractId, PrincipalId};

/// A successful custody state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CustodyEvent {
    /// A new escrow was created, awaiting its deposit.
    EscrowCreated {
        contract_id: ContractId,
        depositor: PrincipalId,
        beneficiary: PrincipalId,
        arbiter: PrincipalId,
        at: DateTime<Utc>,
    },

    /// The depositor funded the escrow.
    DepositMade {
        contract_id: ContractId,
        actor: PrincipalId,
        amount: Decimal,
        at: DateTime<Utc>,
    },

    /// A party recorded its consent to release; funds did not move.
    ApprovalRecorded {
        contract_id: ContractId,
        actor: PrincipalId,
        at: DateTime<Utc>,
    },

    /// The escrow settled: `amount` was paid to the beneficiary and the
    /// escrow reached its terminal released state.
    Released {
        contract_id: ContractId,
        actor: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
        at: DateTime<Utc>,
    },

    /// The arbiter released part of the balance to the beneficiary;
    /// `remaining` stays under custody.
    PartiallyReleased {
        contract_id: ContractId,
        actor: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
        remaining: Decimal,
        at: DateTime<Utc>,
    },

    /// The escrow settled: the full remaining balance was returned to the
    /// depositor.
    Refunded {
        contract_id: ContractId,
        actor: PrincipalId,
        to: PrincipalId,
        amount: Decimal,
        at: DateTime<Utc>,
    },

    /// The arbiter froze the escrow pending dispute resolution.
    Frozen {
        contract_id: ContractId,
        actor: PrincipalId,
        at: DateTime<Utc>,
    },

    /// The factory's default arbiter was reassigned. Affects only escrows
    /// created afterward.
    ArbiterChanged {
        previous: PrincipalId,
        new_arbiter: PrincipalId,
        actor: PrincipalId,
        at: DateTime<Utc>,
    },
}

impl CustodyEvent {
    /// The canonical kind string of this event, stable for observers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EscrowCreated { .. } => "custody.escrow.created.v1",
            Self::DepositMade { .. } => "custody.deposit.v1",
            Self::ApprovalRecorded { .. } => "custody.approval.v1",
            Self::Released { .. } => "custody.release.v1",
            Self::PartiallyReleased { .. } => "custody.release.partial.v1",
            Self::Refunded { .. } => "custody.refund.v1",
            Self::Frozen { .. } => "custody.freeze.v1",
            Self::ArbiterChanged { .. } => "custody.arbiter.changed.v1",
        }
    }

    /// The amount that moved out of custody in this event, if any.
    ///
    /// Deposits add to custody and report `None` here; observers tracking
    /// the conservation invariant sum payouts against the deposit event.
    pub fn payout(&self) -> Option<Decimal> {
        match self {
            Self::Released { amount, .. }
            | Self::PartiallyReleased { amount, .. }
            | Self::Refunded { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

impl std::fmt::Display for CustodyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kind_strings_are_stable() {
        let event = CustodyEvent::Frozen {
            contract_id: ContractId::of(b"c"),
            actor: PrincipalId::new(),
            at: Utc::now(),
        };
        assert_eq!(event.kind(), "custody.freeze.v1");
        assert_eq!(format!("{event}"), "custody.freeze.v1");
    }

    #[test]
    fn payout_only_on_outbound_events() {
        let deposit = CustodyEvent::DepositMade {
            contract_id: ContractId::of(b"c"),
            actor: PrincipalId::new(),
            amount: dec!(100),
            at: Utc::now(),
        };
        assert_eq!(deposit.payout(), None);

        let refund = CustodyEvent::Refunded {
            contract_id: ContractId::of(b"c"),
            actor: PrincipalId::new(),
            to: PrincipalId::new(),
            amount: dec!(100),
            at: Utc::now(),
        };
        assert_eq!(refund.payout(), Some(dec!(100)));
    }

    #[test]
    fn events_serialize_roundtrip() {
        let event = CustodyEvent::PartiallyReleased {
            contract_id: ContractId::of(b"c"),
            actor: PrincipalId::new(),
            to: PrincipalId::new(),
            amount: dec!(40),
            remaining: dec!(60),
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CustodyEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
