use thiserror::Error;

use pacta_core::{ContractId, ErrorKind, PrincipalId};

/// Errors produced by document registration.
///
/// Verification never errors; only the write path can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The caller is not the registry administrator.
    #[error("caller {caller} is not authorized to register documents")]
    Unauthorized {
        /// The rejected caller.
        caller: PrincipalId,
    },

    /// The document hash was the all-zero sentinel.
    #[error("document hash must not be the zero hash")]
    ZeroHash,

    /// The contract identifier was the all-zero sentinel.
    #[error("contract identifier must not be zero")]
    ZeroContract,

    /// The contract already has a registration. Bindings are write-once;
    /// the original registration is left untouched.
    #[error("contract {0} already has a registered document")]
    AlreadyRegistered(ContractId),
}

impl RegistryError {
    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::ZeroHash | Self::ZeroContract => ErrorKind::Validation,
            Self::AlreadyRegistered(_) => ErrorKind::Conflict,
        }
    }
}
