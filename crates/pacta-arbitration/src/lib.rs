//! # pacta-arbitration — Dispute Arbitration
//!
//! Records disputes against escrows and lets the arbitration authority
//! override the normal settlement path:
//!
//! - **Error** ([`error`]): Structured error enum for the arbitration
//!   subsystem, including propagated custody failures.
//!
//! - **Event** ([`event`]): Typed notifications for dispute filing,
//!   resolution, and authority changes.
//!
//! - **Dispute** ([`dispute`]): The dispute record, transitioning
//!   `unresolved → resolved` exactly once.
//!
//! - **Manager** ([`manager`]): The arbitration manager: files disputes
//!   (freezing the target escrow best-effort), resolves them with a binary
//!   outcome plus free-text rationale, and administers owner and arbiter
//!   authority.
//!
//! The manager decides *who* may resolve and *how* funds move on
//! resolution; it never decides dispute outcomes. The outcome is a human
//! or AI judgment fed in as a boolean plus rationale.

pub mod dispute;
pub mod error;
pub mod event;
pub mod manager;

pub use dispute::Dispute;
pub use error::ArbitrationError;
pub use event::ArbitrationEvent;
pub use manager::ArbitrationManager;
