//! # Error Taxonomy
//!
//! Every fallible operation in the engine fails with one of four kinds.
//! Domain error enums (custody, arbitration, registry) carry structured
//! fields and a human message; each variant maps to an [`ErrorKind`] via a
//! `kind()` method. The kind is the machine-readable half of the contract:
//! the orchestrating service routes on it, never on message text.
//!
//! Every error aborts the attempted operation with no partial state
//! mutation. The engine never retries internally; retry policy belongs to
//! the caller, and only for kinds where [`ErrorKind::requires_refresh`]
//! is false.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four error kinds shared across all engine components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The caller is not the required principal for the attempted operation.
    Authorization,
    /// The operation is not valid in the object's current state.
    State,
    /// Structurally invalid input: nil principal, non-positive amount,
    /// identical parties, zero hash, amount exceeding balance.
    Validation,
    /// Identifier collision: the record already exists.
    Conflict,
}

impl ErrorKind {
    /// The canonical string code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "AUTHORIZATION",
            Self::State => "STATE",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
        }
    }

    /// Whether this kind signals that the caller's view of the world is
    /// stale and must be refreshed before any further attempt.
    ///
    /// [`State`](ErrorKind::State) and [`Conflict`](ErrorKind::Conflict)
    /// failures must never be blindly retried — the object has moved on.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Self::State | Self::Conflict)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse-time validation failures for the identifier newtypes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A hex-encoded identifier contained a non-hex character.
    #[error("invalid hex in identifier: {value}")]
    InvalidHex {
        /// The offending input.
        value: String,
    },

    /// A hex-encoded identifier had the wrong length.
    #[error("identifier must be {expected} hex characters, got {actual}")]
    InvalidLength {
        /// Expected number of hex characters.
        expected: usize,
        /// Actual number of hex characters supplied.
        actual: usize,
    },
}

impl ValidationError {
    /// The error kind for parse failures is always Validation.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
