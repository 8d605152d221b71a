//! # Escrow State Machine
//!
//! Per-agreement custody of a single balance between a depositor and a
//! beneficiary, releasable only under defined authorization rules. Uses a
//! validated enum (runtime-checked) rather than typestate: escrows are
//! persisted and transmitted between services, so the state is not known
//! at compile time, and the arbiter paths accept more than one source
//! state.
//!
//! ## Transition Graph
//!
//! ```text
//! AwaitingDeposit ──deposit(amount > 0)──▶ Funded
//!                                            │
//!          ┌──────────── freeze() ───────────┤
//!          ▼                                 │
//!        Frozen ◀────────────────────────────┤
//!          │                                 │
//!          ├── release() [arbiter] ──────────┼──▶ Released
//!          ├── release_partial(x == balance)─┼──▶ Released
//!          ├── release_partial(x < balance) ─┤    (state unchanged)
//!          └── refund() [arbiter] ───────────┴──▶ Refunded
//!
//! Funded ── release() with both approvals ──▶ Released
//! ```
//!
//! ## Security Invariant
//!
//! The balance changes only inside `deposit`, `release`, `refund`, and
//! `release_partial`; there is no other entry point for adding or removing
//! funds. The sum of all payouts ever made equals the amount ever
//! deposited. Every guard runs before any field is written, so a failed
//! operation leaves the escrow exactly as it was. Terminal states reject
//! all further operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pacta_core::{ContractId, PrincipalId};

use crate::error::CustodyError;
use crate::event::CustodyEvent;

// ── Escrow State ───────────────────────────────────────────────────────

/// The lifecycle state of an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// Created; waiting for the depositor to fund it.
    AwaitingDeposit,
    /// Funded; all settlement paths are open.
    Funded,
    /// Suspended by the arbiter pending dispute resolution. Dual-approval
    /// settlement is closed; only the arbiter can move funds.
    Frozen,
    /// Full balance paid to the beneficiary. Terminal state.
    Released,
    /// Full remaining balance returned to the depositor. Terminal state.
    Refunded,
    /// Reserved for a future dispute-intake path; no current operation
    /// produces it. Kept for serialization stability.
    Disputed,
}

impl EscrowState {
    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingDeposit => "AWAITING_DEPOSIT",
            Self::Funded => "FUNDED",
            Self::Frozen => "FROZEN",
            Self::Released => "RELEASED",
            Self::Refunded => "REFUNDED",
            Self::Disputed => "DISPUTED",
        }
    }

    /// Whether this state is terminal (no further state-changing operation
    /// succeeds).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [EscrowState] {
        match self {
            Self::AwaitingDeposit => &[Self::Funded],
            Self::Funded => &[Self::Frozen, Self::Released, Self::Refunded],
            Self::Frozen => &[Self::Funded, Self::Released, Self::Refunded],
            Self::Released | Self::Refunded | Self::Disputed => &[],
        }
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── The Escrow ─────────────────────────────────────────────────────────

/// A custody account holding funds for one contract between exactly one
/// depositor and one beneficiary until a release condition is met.
///
/// Constructed by the factory at agreement-creation time; mutated only by
/// depositor, beneficiary, and arbiter calls. Every mutating operation
/// takes the acting principal explicitly and returns the [`CustodyEvent`]
/// it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escrow {
    contract_id: ContractId,
    depositor: PrincipalId,
    beneficiary: PrincipalId,
    arbiter: PrincipalId,
    /// Live remaining balance under custody.
    amount: Decimal,
    state: EscrowState,
    depositor_approval: bool,
    beneficiary_approval: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Append-only audit trail of every successful state change.
    events: Vec<CustodyEvent>,
}

impl Escrow {
    /// Create a new escrow awaiting its deposit.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::ZeroContract`] for the all-zero contract
    /// identifier, [`CustodyError::NilPrincipal`] for any nil party, and
    /// [`CustodyError::IdenticalParties`] when depositor and beneficiary
    /// are the same principal.
    pub fn new(
        contract_id: ContractId,
        depositor: PrincipalId,
        beneficiary: PrincipalId,
        arbiter: PrincipalId,
    ) -> Result<Self, CustodyError> {
        if contract_id.is_zero() {
            return Err(CustodyError::ZeroContract);
        }
        if depositor.is_nil() {
            return Err(CustodyError::NilPrincipal { role: "depositor" });
        }
        if beneficiary.is_nil() {
            return Err(CustodyError::NilPrincipal { role: "beneficiary" });
        }
        if arbiter.is_nil() {
            return Err(CustodyError::NilPrincipal { role: "arbiter" });
        }
        if depositor == beneficiary {
            return Err(CustodyError::IdenticalParties);
        }
        let now = Utc::now();
        Ok(Self {
            contract_id,
            depositor,
            beneficiary,
            arbiter,
            amount: Decimal::ZERO,
            state: EscrowState::AwaitingDeposit,
            depositor_approval: false,
            beneficiary_approval: false,
            created_at: now,
            updated_at: now,
            events: vec![CustodyEvent::EscrowCreated {
                contract_id,
                depositor,
                beneficiary,
                arbiter,
                at: now,
            }],
        })
    }

    // ── Mutating operations ────────────────────────────────────────────

    /// Fund the escrow. This is the only entry point for adding funds;
    /// unsolicited transfers have nowhere to land.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Unauthorized`] unless the caller is the
    /// depositor, [`CustodyError::InvalidState`] outside
    /// [`AwaitingDeposit`](EscrowState::AwaitingDeposit) (a second deposit
    /// of any amount fails here), and [`CustodyError::NonPositiveAmount`]
    /// for a zero or negative amount.
    pub fn deposit(
        &mut self,
        caller: PrincipalId,
        amount: Decimal,
    ) -> Result<CustodyEvent, CustodyError> {
        if caller != self.depositor {
            return Err(CustodyError::Unauthorized {
                caller,
                action: "deposit",
            });
        }
        if self.state != EscrowState::AwaitingDeposit {
            return Err(CustodyError::InvalidState {
                operation: "deposit",
                state: self.state,
            });
        }
        if amount <= Decimal::ZERO {
            return Err(CustodyError::NonPositiveAmount(amount));
        }
        self.amount = amount;
        self.state = EscrowState::Funded;
        Ok(self.push_event(CustodyEvent::DepositMade {
            contract_id: self.contract_id,
            actor: caller,
            amount,
            at: Utc::now(),
        }))
    }

    /// Release the balance to the beneficiary.
    ///
    /// The arbiter settles unconditionally, from `Funded` or `Frozen` (a
    /// freeze suspends only the dual-approval path). The depositor or the
    /// beneficiary instead records its approval; settlement happens on
    /// whichever call completes the pair, and only from `Funded`.
    /// Re-approval by the same party is an idempotent success.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Unauthorized`] for any other caller and
    /// [`CustodyError::InvalidState`] when the required source state does
    /// not hold.
    pub fn release(&mut self, caller: PrincipalId) -> Result<CustodyEvent, CustodyError> {
        if caller == self.arbiter {
            self.require_in_custody("release")?;
            return Ok(self.settle(caller, SettleTo::Beneficiary));
        }
        if caller == self.depositor || caller == self.beneficiary {
            if self.state != EscrowState::Funded {
                return Err(CustodyError::InvalidState {
                    operation: "release",
                    state: self.state,
                });
            }
            if caller == self.depositor {
                self.depositor_approval = true;
            } else {
                self.beneficiary_approval = true;
            }
            if self.depositor_approval && self.beneficiary_approval {
                return Ok(self.settle(caller, SettleTo::Beneficiary));
            }
            return Ok(self.push_event(CustodyEvent::ApprovalRecorded {
                contract_id: self.contract_id,
                actor: caller,
                at: Utc::now(),
            }));
        }
        Err(CustodyError::Unauthorized {
            caller,
            action: "release",
        })
    }

    /// Return the remaining balance to the depositor.
    ///
    /// Mirrors [`release`](Escrow::release) with the depositor as payee.
    /// The arbiter path is unconditional and valid from `Funded` or
    /// `Frozen`; the party path requires `Funded` and both approvals
    /// already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Unauthorized`] for any other caller,
    /// [`CustodyError::ApprovalsRequired`] when a party calls without
    /// mutual consent, and [`CustodyError::InvalidState`] when the source
    /// state does not hold.
    pub fn refund(&mut self, caller: PrincipalId) -> Result<CustodyEvent, CustodyError> {
        if caller == self.arbiter {
            self.require_in_custody("refund")?;
            return Ok(self.settle(caller, SettleTo::Depositor));
        }
        if caller == self.depositor || caller == self.beneficiary {
            if self.state != EscrowState::Funded {
                return Err(CustodyError::InvalidState {
                    operation: "refund",
                    state: self.state,
                });
            }
            if !(self.depositor_approval && self.beneficiary_approval) {
                return Err(CustodyError::ApprovalsRequired);
            }
            return Ok(self.settle(caller, SettleTo::Depositor));
        }
        Err(CustodyError::Unauthorized {
            caller,
            action: "refund",
        })
    }

    /// Suspend dual-approval settlement while a dispute is pending.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Unauthorized`] unless the caller is the
    /// arbiter and [`CustodyError::InvalidState`] outside
    /// [`Funded`](EscrowState::Funded) (freezing twice fails here).
    pub fn freeze(&mut self, caller: PrincipalId) -> Result<CustodyEvent, CustodyError> {
        if caller != self.arbiter {
            return Err(CustodyError::Unauthorized {
                caller,
                action: "freeze",
            });
        }
        if self.state != EscrowState::Funded {
            return Err(CustodyError::InvalidState {
                operation: "freeze",
                state: self.state,
            });
        }
        self.state = EscrowState::Frozen;
        Ok(self.push_event(CustodyEvent::Frozen {
            contract_id: self.contract_id,
            actor: caller,
            at: Utc::now(),
        }))
    }

    /// Release part of the balance to the beneficiary.
    ///
    /// Arbiter-only; requires no approvals. "Balance" is always the live
    /// remaining amount, decremented by prior partial releases. Releasing
    /// exactly the remaining balance settles the escrow to `Released`,
    /// from either `Funded` or `Frozen`; otherwise the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::Unauthorized`] unless the caller is the
    /// arbiter, [`CustodyError::InvalidState`] outside `Funded`/`Frozen`,
    /// [`CustodyError::NonPositiveAmount`] for a zero or negative amount,
    /// and [`CustodyError::InsufficientBalance`] when the amount exceeds
    /// the remaining balance.
    pub fn release_partial(
        &mut self,
        caller: PrincipalId,
        amount: Decimal,
    ) -> Result<CustodyEvent, CustodyError> {
        if caller != self.arbiter {
            return Err(CustodyError::Unauthorized {
                caller,
                action: "release_partial",
            });
        }
        self.require_in_custody("release_partial")?;
        if amount <= Decimal::ZERO {
            return Err(CustodyError::NonPositiveAmount(amount));
        }
        if amount > self.amount {
            return Err(CustodyError::InsufficientBalance {
                requested: amount,
                available: self.amount,
            });
        }
        self.amount -= amount;
        if self.amount.is_zero() {
            self.state = EscrowState::Released;
            return Ok(self.push_event(CustodyEvent::Released {
                contract_id: self.contract_id,
                actor: caller,
                to: self.beneficiary,
                amount,
                at: Utc::now(),
            }));
        }
        Ok(self.push_event(CustodyEvent::PartiallyReleased {
            contract_id: self.contract_id,
            actor: caller,
            to: self.beneficiary,
            amount,
            remaining: self.amount,
            at: Utc::now(),
        }))
    }

    // ── Read accessors ─────────────────────────────────────────────────

    /// The immutable contract identifier this escrow custodies for.
    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    /// The current lifecycle state.
    pub fn state(&self) -> EscrowState {
        self.state
    }

    /// The live remaining balance under custody.
    pub fn balance(&self) -> Decimal {
        self.amount
    }

    /// The principal that funds the escrow.
    pub fn depositor(&self) -> PrincipalId {
        self.depositor
    }

    /// The principal the balance releases to.
    pub fn beneficiary(&self) -> PrincipalId {
        self.beneficiary
    }

    /// The principal with unconditional settlement authority.
    pub fn arbiter(&self) -> PrincipalId {
        self.arbiter
    }

    /// The dual-consent flags as `(depositor, beneficiary)`.
    pub fn approvals(&self) -> (bool, bool) {
        (self.depositor_approval, self.beneficiary_approval)
    }

    /// When the escrow was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the escrow last changed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The append-only audit trail of every successful state change.
    pub fn events(&self) -> &[CustodyEvent] {
        &self.events
    }

    // ── Internal helpers ───────────────────────────────────────────────

    /// Check that funds are under active custody (`Funded` or `Frozen`).
    fn require_in_custody(&self, operation: &'static str) -> Result<(), CustodyError> {
        match self.state {
            EscrowState::Funded | EscrowState::Frozen => Ok(()),
            state => Err(CustodyError::InvalidState { operation, state }),
        }
    }

    /// Pay out the full remaining balance and enter the terminal state.
    fn settle(&mut self, actor: PrincipalId, to: SettleTo) -> CustodyEvent {
        let payout = self.amount;
        self.amount = Decimal::ZERO;
        let event = match to {
            SettleTo::Beneficiary => {
                self.state = EscrowState::Released;
                CustodyEvent::Released {
                    contract_id: self.contract_id,
                    actor,
                    to: self.beneficiary,
                    amount: payout,
                    at: Utc::now(),
                }
            }
            SettleTo::Depositor => {
                self.state = EscrowState::Refunded;
                CustodyEvent::Refunded {
                    contract_id: self.contract_id,
                    actor,
                    to: self.depositor,
                    amount: payout,
                    at: Utc::now(),
                }
            }
        };
        self.push_event(event)
    }

    /// Append to the audit trail, refresh `updated_at`, and hand the event
    /// back to the caller.
    fn push_event(&mut self, event: CustodyEvent) -> CustodyEvent {
        self.updated_at = Utc::now();
        self.events.push(event.clone());
        event
    }
}

/// Which party a settlement pays.
enum SettleTo {
    Beneficiary,
    Depositor,
}
