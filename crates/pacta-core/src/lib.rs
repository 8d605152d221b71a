//! # pacta-core — Foundational Types
//!
//! Shared building blocks for the escrow-custody and dispute-arbitration
//! engine:
//!
//! - **Identity** ([`identity`]): Domain-primitive newtypes for principals,
//!   contracts, disputes, and document hashes. Each identifier is a distinct
//!   type — you cannot pass a [`PrincipalId`] where a [`ContractId`] is
//!   expected.
//!
//! - **Error** ([`error`]): The four-kind error taxonomy shared by every
//!   component. Domain errors in the custody, arbitration, and registry
//!   crates each map into an [`ErrorKind`] so the orchestrating service can
//!   surface each kind distinctly without matching on message strings.
//!
//! This crate has no dependency on any other pacta crate.

pub mod error;
pub mod identity;

pub use error::{ErrorKind, ValidationError};
pub use identity::{ContractId, DisputeId, DocumentHash, PrincipalId};
