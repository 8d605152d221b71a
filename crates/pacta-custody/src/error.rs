//! # Custody Errors
//!
//! Structured error enum for the custody subsystem. Every variant carries
//! the fields a caller needs to act on the failure and maps into the shared
//! [`ErrorKind`] taxonomy via [`CustodyError::kind`]. Failure reasons are
//! tagged variants, never matched-on message strings.
//!
//! Every error aborts the attempted operation with no partial state
//! mutation: guards run before any field is written.

use rust_decimal::Decimal;
use thiserror::Error;

use pacta_core::{ContractId, ErrorKind, PrincipalId};

use crate::escrow::EscrowState;

/// Errors produced by escrow operations and the factory store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CustodyError {
    /// The caller is not the principal required for this operation.
    #[error("caller {caller} is not authorized to {action}")]
    Unauthorized {
        /// The rejected caller.
        caller: PrincipalId,
        /// The attempted operation.
        action: &'static str,
    },

    /// A party attempted the consent-based refund path before both
    /// approvals were recorded.
    #[error("refund by a party requires both approvals to be recorded")]
    ApprovalsRequired,

    /// The operation is not defined in the escrow's current state.
    #[error("cannot {operation} an escrow in state {state}")]
    InvalidState {
        /// The attempted operation.
        operation: &'static str,
        /// The escrow's current state.
        state: EscrowState,
    },

    /// A deposit or partial release of a non-positive amount.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A partial release larger than the remaining balance.
    #[error("partial release of {requested} exceeds remaining balance {available}")]
    InsufficientBalance {
        /// Amount requested for release.
        requested: Decimal,
        /// Live remaining balance.
        available: Decimal,
    },

    /// A required principal was the nil sentinel.
    #[error("{role} must not be the nil principal")]
    NilPrincipal {
        /// Which role was nil: "depositor", "beneficiary", "arbiter", "owner".
        role: &'static str,
    },

    /// Depositor and beneficiary must be distinct principals.
    #[error("depositor and beneficiary must be distinct principals")]
    IdenticalParties,

    /// The contract identifier was the all-zero sentinel.
    #[error("contract identifier must not be all zeroes")]
    ZeroContract,

    /// An escrow already exists for this contract identifier.
    #[error("an escrow already exists for contract {0}")]
    DuplicateContract(ContractId),

    /// No escrow exists for this contract identifier.
    #[error("no escrow exists for contract {0}")]
    UnknownContract(ContractId),
}

impl CustodyError {
    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } | Self::ApprovalsRequired => ErrorKind::Authorization,
            Self::InvalidState { .. } | Self::UnknownContract(_) => ErrorKind::State,
            Self::NonPositiveAmount(_)
            | Self::InsufficientBalance { .. }
            | Self::NilPrincipal { .. }
            | Self::IdenticalParties
            | Self::ZeroContract => ErrorKind::Validation,
            Self::DuplicateContract(_) => ErrorKind::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kinds_cover_the_taxonomy() {
        let caller = PrincipalId::new();
        assert_eq!(
            CustodyError::Unauthorized {
                caller,
                action: "release"
            }
            .kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            CustodyError::InvalidState {
                operation: "deposit",
                state: EscrowState::Funded
            }
            .kind(),
            ErrorKind::State
        );
        assert_eq!(
            CustodyError::NonPositiveAmount(dec!(0)).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CustodyError::DuplicateContract(ContractId::of(b"a")).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn unknown_contract_is_a_state_error() {
        // A missing escrow means the caller's world-model is stale, which
        // the taxonomy treats as non-retriable without a refresh.
        let err = CustodyError::UnknownContract(ContractId::of(b"missing"));
        assert!(err.kind().requires_refresh());
    }

    #[test]
    fn messages_are_descriptive() {
        let err = CustodyError::InsufficientBalance {
            requested: dec!(500),
            available: dec!(100),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("100"));
    }
}
