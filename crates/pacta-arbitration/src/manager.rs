//! # Arbitration Manager
//!
//! Files disputes against escrowed contracts, resolves them with a binary
//! outcome, and administers owner and arbiter authority. The manager acts
//! on the custody layer as its own `authority` principal, which escrows
//! recognize as their arbiter when the factory is deployed with it.
//!
//! Filing freezes the target escrow *best-effort*: a freeze that fails
//! (unknown contract, escrow not yet funded, already settled) is logged
//! and swallowed, and the dispute is recorded regardless. Resolution is
//! the opposite: the custody instruction runs first, and only when it
//! succeeds is the dispute stamped resolved, so a failed payout leaves the
//! dispute open for a retry.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use pacta_core::{ContractId, DisputeId, PrincipalId};
use pacta_custody::EscrowFactory;

use crate::dispute::Dispute;
use crate::error::ArbitrationError;
use crate::event::ArbitrationEvent;

/// Records disputes and routes their resolution through custody.
///
/// Reads return cloned snapshots; filing and resolution run
/// read-validate-update under the dispute entry's write lock.
pub struct ArbitrationManager {
    /// The principal this manager acts as when instructing custody.
    authority: PrincipalId,
    owner: RwLock<PrincipalId>,
    arbiter: RwLock<PrincipalId>,
    disputes: DashMap<DisputeId, Dispute>,
}

impl ArbitrationManager {
    /// Create a new manager. The arbiter starts out as the owner until
    /// [`ArbitrationManager::set_arbiter`] assigns a dedicated one.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::NilPrincipal`] if the authority or the
    /// owner is nil.
    pub fn new(authority: PrincipalId, owner: PrincipalId) -> Result<Self, ArbitrationError> {
        if authority.is_nil() {
            return Err(ArbitrationError::NilPrincipal { role: "authority" });
        }
        if owner.is_nil() {
            return Err(ArbitrationError::NilPrincipal { role: "owner" });
        }
        Ok(Self {
            authority,
            owner: RwLock::new(owner),
            arbiter: RwLock::new(owner),
            disputes: DashMap::new(),
        })
    }

    /// The principal this manager acts as on the custody layer.
    pub fn authority(&self) -> PrincipalId {
        self.authority
    }

    /// The manager's administering principal.
    pub fn owner(&self) -> PrincipalId {
        *self.owner.read()
    }

    /// The principal currently authorized to resolve disputes.
    pub fn arbiter(&self) -> PrincipalId {
        *self.arbiter.read()
    }

    /// Look up a dispute. Returns a snapshot, or `None` if no dispute has
    /// that identifier.
    pub fn get_dispute(&self, dispute_id: DisputeId) -> Option<Dispute> {
        self.disputes.get(&dispute_id).map(|entry| entry.clone())
    }

    /// Total number of disputes on file, resolved or not.
    pub fn dispute_count(&self) -> usize {
        self.disputes.len()
    }

    /// File a dispute against the escrow of `contract_id` and freeze that
    /// escrow best-effort. Only the plaintiff, the owner, or the arbiter
    /// may file.
    ///
    /// The freeze may fail when the escrow does not exist, has not been
    /// funded, or has already settled; the dispute is recorded either way
    /// and the event's `escrow_frozen` flag reports what happened.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::NilPrincipal`] or
    /// [`ArbitrationError::ZeroEscrowRef`] for sentinel inputs,
    /// [`ArbitrationError::Unauthorized`] for other callers, and
    /// [`ArbitrationError::DuplicateDispute`] when the identifier is
    /// already on file. A rejected filing records nothing and freezes
    /// nothing.
    pub fn file_dispute(
        &self,
        custody: &EscrowFactory,
        caller: PrincipalId,
        dispute_id: DisputeId,
        contract_id: ContractId,
        plaintiff: PrincipalId,
        defendant: PrincipalId,
    ) -> Result<ArbitrationEvent, ArbitrationError> {
        if plaintiff.is_nil() {
            return Err(ArbitrationError::NilPrincipal { role: "plaintiff" });
        }
        if defendant.is_nil() {
            return Err(ArbitrationError::NilPrincipal { role: "defendant" });
        }
        if contract_id.is_zero() {
            return Err(ArbitrationError::ZeroEscrowRef);
        }
        if caller != plaintiff && caller != self.owner() && caller != self.arbiter() {
            return Err(ArbitrationError::Unauthorized {
                caller,
                action: "file_dispute",
            });
        }

        match self.disputes.entry(dispute_id) {
            Entry::Occupied(_) => Err(ArbitrationError::DuplicateDispute(dispute_id)),
            Entry::Vacant(slot) => {
                let escrow_frozen = match custody.freeze(contract_id, self.authority) {
                    Ok(_) => true,
                    Err(err) => {
                        tracing::warn!(
                            dispute = %dispute_id,
                            contract = %contract_id,
                            error = %err,
                            "escrow freeze failed, dispute recorded anyway"
                        );
                        false
                    }
                };

                let dispute = Dispute::new(dispute_id, contract_id, plaintiff, defendant);
                let filed_at = dispute.filed_at();
                slot.insert(dispute);
                tracing::info!(
                    dispute = %dispute_id,
                    contract = %contract_id,
                    plaintiff = %plaintiff,
                    defendant = %defendant,
                    frozen = escrow_frozen,
                    "dispute filed"
                );
                Ok(ArbitrationEvent::DisputeFiled {
                    dispute_id,
                    contract_id,
                    plaintiff,
                    defendant,
                    actor: caller,
                    escrow_frozen,
                    at: filed_at,
                })
            }
        }
    }

    /// Resolve a dispute with a binary outcome. Only the owner or the
    /// arbiter may resolve. `favor_beneficiary` releases the escrow's
    /// balance to the beneficiary; otherwise the balance is refunded to
    /// the depositor.
    ///
    /// The custody instruction runs before the dispute is stamped: if the
    /// escrow rejects the release or refund, that error propagates and the
    /// dispute stays open.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::Unauthorized`] for other callers,
    /// [`ArbitrationError::UnknownDispute`] or
    /// [`ArbitrationError::AlreadyResolved`] for bad dispute state, and
    /// [`ArbitrationError::Custody`] when the escrow instruction fails.
    pub fn resolve_dispute(
        &self,
        custody: &EscrowFactory,
        caller: PrincipalId,
        dispute_id: DisputeId,
        resolution: impl Into<String>,
        favor_beneficiary: bool,
    ) -> Result<ArbitrationEvent, ArbitrationError> {
        if caller != self.owner() && caller != self.arbiter() {
            return Err(ArbitrationError::Unauthorized {
                caller,
                action: "resolve_dispute",
            });
        }

        let mut entry = self
            .disputes
            .get_mut(&dispute_id)
            .ok_or(ArbitrationError::UnknownDispute(dispute_id))?;
        let dispute = entry.value_mut();
        if dispute.is_resolved() {
            return Err(ArbitrationError::AlreadyResolved(dispute_id));
        }

        let contract_id = dispute.contract_id();
        let custody_event = if favor_beneficiary {
            custody.release(contract_id, self.authority)?
        } else {
            custody.refund(contract_id, self.authority)?
        };
        let amount = custody_event.payout();

        dispute.mark_resolved(resolution.into())?;
        tracing::info!(
            dispute = %dispute_id,
            contract = %contract_id,
            favor_beneficiary,
            "dispute resolved"
        );
        Ok(ArbitrationEvent::DisputeResolved {
            dispute_id,
            contract_id,
            favor_beneficiary,
            actor: caller,
            amount,
            at: Utc::now(),
        })
    }

    /// Reassign the arbiter. The new arbiter may resolve any still-open
    /// dispute; already-resolved disputes are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::Unauthorized`] unless the caller is the
    /// owner and [`ArbitrationError::NilPrincipal`] for the nil arbiter.
    pub fn set_arbiter(
        &self,
        caller: PrincipalId,
        new_arbiter: PrincipalId,
    ) -> Result<ArbitrationEvent, ArbitrationError> {
        if caller != self.owner() {
            return Err(ArbitrationError::Unauthorized {
                caller,
                action: "set_arbiter",
            });
        }
        if new_arbiter.is_nil() {
            return Err(ArbitrationError::NilPrincipal { role: "arbiter" });
        }
        let previous = {
            let mut slot = self.arbiter.write();
            std::mem::replace(&mut *slot, new_arbiter)
        };
        tracing::info!(previous = %previous, arbiter = %new_arbiter, "arbiter reassigned");
        Ok(ArbitrationEvent::ArbiterChanged {
            previous,
            new_arbiter,
            actor: caller,
            at: Utc::now(),
        })
    }

    /// Transfer manager ownership to a new principal.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::Unauthorized`] unless the caller is the
    /// current owner and [`ArbitrationError::NilPrincipal`] for the nil
    /// owner.
    pub fn transfer_ownership(
        &self,
        caller: PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<ArbitrationEvent, ArbitrationError> {
        if caller != self.owner() {
            return Err(ArbitrationError::Unauthorized {
                caller,
                action: "transfer_ownership",
            });
        }
        if new_owner.is_nil() {
            return Err(ArbitrationError::NilPrincipal { role: "owner" });
        }
        let previous = {
            let mut slot = self.owner.write();
            std::mem::replace(&mut *slot, new_owner)
        };
        tracing::info!(previous = %previous, owner = %new_owner, "ownership transferred");
        Ok(ArbitrationEvent::OwnershipTransferred {
            previous,
            new_owner,
            actor: caller,
            at: Utc::now(),
        })
    }
}
