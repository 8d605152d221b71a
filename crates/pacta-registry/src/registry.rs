//! # Document Registry
//!
//! Write-once ledger binding a contract identifier to the content hash of
//! its governing document. Registration is administrator-only and happens
//! at most once per contract; verification is a pure read that never
//! errors, so callers probing for tampering cannot be distinguished from
//! callers probing for existence.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use pacta_core::{ContractId, DocumentHash, PrincipalId};

use crate::error::RegistryError;

/// The stored binding of a contract to its document hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRegistration {
    /// The contract this document governs.
    pub contract_id: ContractId,
    /// SHA-256 hash of the document's content bytes.
    pub document_hash: DocumentHash,
    /// The administrator who registered it.
    pub registered_by: PrincipalId,
    /// When the binding was recorded.
    pub registered_at: DateTime<Utc>,
}

/// The outcome of verifying a document against the registry.
///
/// `registered_at` is `None` only when the contract has no registration at
/// all; a hash mismatch against an existing registration still reports the
/// registration timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    /// Whether the presented hash matches the registered one.
    pub matches: bool,
    /// When the contract's document was registered, if it ever was.
    pub registered_at: Option<DateTime<Utc>>,
}

/// A successful registry state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A document hash was bound to a contract.
    DocumentRegistered {
        contract_id: ContractId,
        document_hash: DocumentHash,
        actor: PrincipalId,
        at: DateTime<Utc>,
    },
}

impl RegistryEvent {
    /// The canonical kind string of this event, stable for observers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DocumentRegistered { .. } => "registry.document.registered.v1",
        }
    }
}

/// Append-only store of contract-to-document bindings.
pub struct DocumentRegistry {
    administrator: PrincipalId,
    entries: DashMap<ContractId, DocumentRegistration>,
}

impl DocumentRegistry {
    /// Create an empty registry administered by `administrator`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unauthorized`] if the administrator is the
    /// nil principal, since a nil administrator would make every later
    /// registration unauthorized anyway.
    pub fn new(administrator: PrincipalId) -> Result<Self, RegistryError> {
        if administrator.is_nil() {
            return Err(RegistryError::Unauthorized {
                caller: administrator,
            });
        }
        Ok(Self {
            administrator,
            entries: DashMap::new(),
        })
    }

    /// The registry's administering principal.
    pub fn administrator(&self) -> PrincipalId {
        self.administrator
    }

    /// Bind `document_hash` to `contract_id`, write-once.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unauthorized`] for non-administrator
    /// callers, [`RegistryError::ZeroContract`] and
    /// [`RegistryError::ZeroHash`] for sentinel inputs, and
    /// [`RegistryError::AlreadyRegistered`] when the contract already has
    /// a binding.
    pub fn register_document(
        &self,
        caller: PrincipalId,
        contract_id: ContractId,
        document_hash: DocumentHash,
    ) -> Result<RegistryEvent, RegistryError> {
        if caller != self.administrator {
            return Err(RegistryError::Unauthorized { caller });
        }
        if contract_id.is_zero() {
            return Err(RegistryError::ZeroContract);
        }
        if document_hash.is_zero() {
            return Err(RegistryError::ZeroHash);
        }
        match self.entries.entry(contract_id) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyRegistered(contract_id)),
            Entry::Vacant(slot) => {
                let registered_at = Utc::now();
                slot.insert(DocumentRegistration {
                    contract_id,
                    document_hash,
                    registered_by: caller,
                    registered_at,
                });
                tracing::info!(
                    contract = %contract_id,
                    hash = %document_hash,
                    "document registered"
                );
                Ok(RegistryEvent::DocumentRegistered {
                    contract_id,
                    document_hash,
                    actor: caller,
                    at: registered_at,
                })
            }
        }
    }

    /// Compare a presented hash against the registered one. Never errors:
    /// an unregistered contract verifies as `(false, None)`.
    pub fn verify_document(
        &self,
        contract_id: ContractId,
        document_hash: DocumentHash,
    ) -> Verification {
        match self.entries.get(&contract_id) {
            Some(entry) => Verification {
                matches: entry.document_hash == document_hash,
                registered_at: Some(entry.registered_at),
            },
            None => Verification {
                matches: false,
                registered_at: None,
            },
        }
    }

    /// Look up the registration for a contract. Returns a snapshot, or
    /// `None` if the contract has no registered document.
    pub fn get_registration(&self, contract_id: ContractId) -> Option<DocumentRegistration> {
        self.entries.get(&contract_id).map(|entry| entry.clone())
    }
}
