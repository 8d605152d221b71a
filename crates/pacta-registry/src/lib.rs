//! # pacta-registry — Document Registry
//!
//! Write-once binding of a contract identifier to the SHA-256 hash of its
//! governing document, for later tamper-evidence checks:
//!
//! - **Error** ([`error`]): Structured error enum for the registration
//!   path. Verification is infallible.
//!
//! - **Registry** ([`registry`]): The registration record, the
//!   verification verdict, and the append-only store.

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::{DocumentRegistration, DocumentRegistry, RegistryEvent, Verification};
