//! # Arbitration Errors
//!
//! Structured error enum for the arbitration subsystem. Custody failures
//! that surface while instructing an escrow propagate transparently and
//! keep their own kind; dispute-local failures map into the shared
//! taxonomy here.

use thiserror::Error;

use pacta_core::{DisputeId, ErrorKind, PrincipalId};
use pacta_custody::CustodyError;

/// Errors produced by dispute filing, resolution, and administration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArbitrationError {
    /// The caller is not a principal permitted to perform this operation.
    #[error("caller {caller} is not authorized to {action}")]
    Unauthorized {
        /// The rejected caller.
        caller: PrincipalId,
        /// The attempted operation.
        action: &'static str,
    },

    /// A dispute with this identifier is already on file. The original
    /// record is left untouched.
    #[error("dispute {0} is already on file")]
    DuplicateDispute(DisputeId),

    /// No dispute exists with this identifier.
    #[error("dispute {0} does not exist")]
    UnknownDispute(DisputeId),

    /// The dispute has already been resolved; resolution happens exactly
    /// once.
    #[error("dispute {0} is already resolved")]
    AlreadyResolved(DisputeId),

    /// A required principal was the nil sentinel.
    #[error("{role} must not be the nil principal")]
    NilPrincipal {
        /// Which role was nil: "plaintiff", "defendant", "arbiter", "owner".
        role: &'static str,
    },

    /// The escrow reference (contract identifier) was the all-zero
    /// sentinel.
    #[error("escrow reference must not be the zero contract identifier")]
    ZeroEscrowRef,

    /// A custody operation failed while instructing the escrow.
    #[error(transparent)]
    Custody(#[from] CustodyError),
}

impl ArbitrationError {
    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::UnknownDispute(_) | Self::AlreadyResolved(_) => ErrorKind::State,
            Self::NilPrincipal { .. } | Self::ZeroEscrowRef => ErrorKind::Validation,
            Self::DuplicateDispute(_) => ErrorKind::Conflict,
            Self::Custody(inner) => inner.kind(),
        }
    }
}
