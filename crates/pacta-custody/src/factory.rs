//! # Escrow Factory
//!
//! In-memory escrow store backed by `DashMap`, keyed by contract
//! identifier. Creates and indexes exactly one escrow per contract and
//! holds the default arbiter assigned to subsequently created escrows.
//!
//! ## Concurrency Model
//!
//! Every mutation of a single escrow runs read-validate-update under one
//! shard write lock (`DashMap::get_mut`), so two in-flight mutations
//! against the same escrow never interleave: the authorization check and
//! the balance mutation are evaluated against the same snapshot. This is
//! the single-writer-per-entity discipline — whole-object atomicity, not
//! field-level locking.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use pacta_core::{ContractId, PrincipalId};

use crate::error::CustodyError;
use crate::escrow::Escrow;
use crate::event::CustodyEvent;

/// Creates, indexes, and serializes access to escrows.
///
/// Reads return cloned snapshots; mutations go through the per-escrow
/// operation methods, which hold the entry's write lock for the whole
/// read-validate-update cycle.
pub struct EscrowFactory {
    owner: PrincipalId,
    /// Arbiter assigned to escrows created from now on. Reassignment never
    /// rewires existing escrows.
    default_arbiter: RwLock<PrincipalId>,
    escrows: DashMap<ContractId, Escrow>,
}

impl EscrowFactory {
    /// Create a new factory.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::NilPrincipal`] if the owner or the default
    /// arbiter is nil.
    pub fn new(owner: PrincipalId, default_arbiter: PrincipalId) -> Result<Self, CustodyError> {
        if owner.is_nil() {
            return Err(CustodyError::NilPrincipal { role: "owner" });
        }
        if default_arbiter.is_nil() {
            return Err(CustodyError::NilPrincipal { role: "arbiter" });
        }
        Ok(Self {
            owner,
            default_arbiter: RwLock::new(default_arbiter),
            escrows: DashMap::new(),
        })
    }

    /// The factory's administering principal.
    pub fn owner(&self) -> PrincipalId {
        self.owner
    }

    /// The arbiter currently assigned to new escrows.
    pub fn default_arbiter(&self) -> PrincipalId {
        *self.default_arbiter.read()
    }

    /// Create the escrow for `contract_id`, assigning the factory's
    /// current default arbiter. Returns a snapshot of the new escrow.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::DuplicateContract`] if the contract already
    /// has an escrow, plus the construction errors of [`Escrow::new`].
    pub fn create_escrow(
        &self,
        contract_id: ContractId,
        depositor: PrincipalId,
        beneficiary: PrincipalId,
    ) -> Result<Escrow, CustodyError> {
        match self.escrows.entry(contract_id) {
            Entry::Occupied(_) => Err(CustodyError::DuplicateContract(contract_id)),
            Entry::Vacant(slot) => {
                let escrow =
                    Escrow::new(contract_id, depositor, beneficiary, self.default_arbiter())?;
                tracing::info!(
                    contract = %contract_id,
                    depositor = %depositor,
                    beneficiary = %beneficiary,
                    "escrow created"
                );
                Ok(slot.insert(escrow).clone())
            }
        }
    }

    /// Look up the escrow for a contract. Returns a snapshot, or `None`
    /// if the contract has no escrow.
    pub fn get_escrow(&self, contract_id: ContractId) -> Option<Escrow> {
        self.escrows.get(&contract_id).map(|entry| entry.clone())
    }

    /// Total number of escrows ever created.
    pub fn escrow_count(&self) -> usize {
        self.escrows.len()
    }

    /// Reassign the arbiter used for subsequently created escrows.
    /// Existing escrows keep the arbiter they were constructed with.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Unauthorized`] unless the caller is the
    /// owner and [`CustodyError::NilPrincipal`] for the nil arbiter.
    pub fn set_arbiter(
        &self,
        caller: PrincipalId,
        new_arbiter: PrincipalId,
    ) -> Result<CustodyEvent, CustodyError> {
        if caller != self.owner {
            return Err(CustodyError::Unauthorized {
                caller,
                action: "set_arbiter",
            });
        }
        if new_arbiter.is_nil() {
            return Err(CustodyError::NilPrincipal { role: "arbiter" });
        }
        let previous = {
            let mut slot = self.default_arbiter.write();
            std::mem::replace(&mut *slot, new_arbiter)
        };
        tracing::info!(previous = %previous, arbiter = %new_arbiter, "default arbiter reassigned");
        Ok(CustodyEvent::ArbiterChanged {
            previous,
            new_arbiter,
            actor: caller,
            at: chrono::Utc::now(),
        })
    }

    // ── Serialized per-escrow operations ───────────────────────────────

    /// Fund the escrow for `contract_id`. See [`Escrow::deposit`].
    pub fn deposit(
        &self,
        contract_id: ContractId,
        caller: PrincipalId,
        amount: Decimal,
    ) -> Result<CustodyEvent, CustodyError> {
        self.with_escrow(contract_id, caller, |escrow| escrow.deposit(caller, amount))
    }

    /// Release the balance to the beneficiary. See [`Escrow::release`].
    pub fn release(
        &self,
        contract_id: ContractId,
        caller: PrincipalId,
    ) -> Result<CustodyEvent, CustodyError> {
        self.with_escrow(contract_id, caller, |escrow| escrow.release(caller))
    }

    /// Return the remaining balance to the depositor. See [`Escrow::refund`].
    pub fn refund(
        &self,
        contract_id: ContractId,
        caller: PrincipalId,
    ) -> Result<CustodyEvent, CustodyError> {
        self.with_escrow(contract_id, caller, |escrow| escrow.refund(caller))
    }

    /// Freeze the escrow pending dispute resolution. See [`Escrow::freeze`].
    pub fn freeze(
        &self,
        contract_id: ContractId,
        caller: PrincipalId,
    ) -> Result<CustodyEvent, CustodyError> {
        self.with_escrow(contract_id, caller, |escrow| escrow.freeze(caller))
    }

    /// Release part of the balance to the beneficiary. See
    /// [`Escrow::release_partial`].
    pub fn release_partial(
        &self,
        contract_id: ContractId,
        caller: PrincipalId,
        amount: Decimal,
    ) -> Result<CustodyEvent, CustodyError> {
        self.with_escrow(contract_id, caller, |escrow| {
            escrow.release_partial(caller, amount)
        })
    }

    /// Run one mutation against an escrow under its entry write lock.
    fn with_escrow(
        &self,
        contract_id: ContractId,
        caller: PrincipalId,
        op: impl FnOnce(&mut Escrow) -> Result<CustodyEvent, CustodyError>,
    ) -> Result<CustodyEvent, CustodyError> {
        let mut entry = self
            .escrows
            .get_mut(&contract_id)
            .ok_or(CustodyError::UnknownContract(contract_id))?;
        let event = op(entry.value_mut())?;
        tracing::info!(
            contract = %contract_id,
            actor = %caller,
            event = event.kind(),
            "custody state changed"
        );
        Ok(event)
    }
}
