//! # pacta-custody — Escrow Custody
//!
//! Holds funds in trust for a bilateral agreement and enforces who may move
//! them:
//!
//! - **Error** ([`error`]): Structured error enum for the custody subsystem,
//!   mapping into the shared four-kind taxonomy.
//!
//! - **Event** ([`event`]): Typed notifications emitted on every successful
//!   custody state change — the sole channel through which off-core
//!   observers learn of escrow activity.
//!
//! - **Escrow** ([`escrow`]): The per-agreement custody state machine:
//!   `AwaitingDeposit → Funded → {Released | Refunded}` with a
//!   `Funded ⇄ Frozen` side branch for pending disputes.
//!
//! - **Factory** ([`factory`]): Creates and indexes exactly one escrow per
//!   contract identifier and serializes every mutation against a single
//!   escrow — whole-object atomicity, the single-writer-per-entity
//!   discipline.

pub mod error;
pub mod escrow;
pub mod event;
pub mod factory;

pub use error::CustodyError;
pub use escrow::{Escrow, EscrowState};
pub use event::CustodyEvent;
pub use factory::EscrowFactory;
