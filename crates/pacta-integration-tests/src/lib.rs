//! Cross-crate integration tests for the pacta engine.
//!
//! The tests in `tests/` exercise whole settlement and dispute flows
//! across the custody, arbitration, registry, and fee crates. This
//! library target is intentionally empty.
