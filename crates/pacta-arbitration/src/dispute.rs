//! # Dispute Record
//!
//! The append-only record of a filed dispute. A dispute moves through
//! exactly one transition, `unresolved → resolved`, and once resolved it
//! is never reopened or rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pacta_core::{ContractId, DisputeId, PrincipalId};

use crate::error::ArbitrationError;

/// A dispute filed against an escrowed contract.
///
/// Fields are private; state changes go through [`Dispute::mark_resolved`]
/// so the exactly-once resolution rule cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    id: DisputeId,
    contract_id: ContractId,
    plaintiff: PrincipalId,
    defendant: PrincipalId,
    filed_at: DateTime<Utc>,
    resolved: bool,
    resolved_at: Option<DateTime<Utc>>,
    /// Free-text rationale supplied by whoever resolved the dispute.
    resolution: Option<String>,
}

impl Dispute {
    /// Record a new, unresolved dispute.
    pub(crate) fn new(
        id: DisputeId,
        contract_id: ContractId,
        plaintiff: PrincipalId,
        defendant: PrincipalId,
    ) -> Self {
        Self {
            id,
            contract_id,
            plaintiff,
            defendant,
            filed_at: Utc::now(),
            resolved: false,
            resolved_at: None,
            resolution: None,
        }
    }

    /// Stamp the dispute resolved with the given rationale.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::AlreadyResolved`] if the dispute is
    /// already resolved; the original resolution is left untouched.
    pub(crate) fn mark_resolved(&mut self, resolution: String) -> Result<(), ArbitrationError> {
        if self.resolved {
            return Err(ArbitrationError::AlreadyResolved(self.id));
        }
        self.resolved = true;
        self.resolved_at = Some(Utc::now());
        self.resolution = Some(resolution);
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// The dispute's identifier.
    pub fn id(&self) -> DisputeId {
        self.id
    }

    /// The contract whose escrow this dispute targets.
    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    /// The principal who raised the dispute.
    pub fn plaintiff(&self) -> PrincipalId {
        self.plaintiff
    }

    /// The principal the dispute is raised against.
    pub fn defendant(&self) -> PrincipalId {
        self.defendant
    }

    /// When the dispute was filed.
    pub fn filed_at(&self) -> DateTime<Utc> {
        self.filed_at
    }

    /// Whether the dispute has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// When the dispute was resolved, if it has been.
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// The resolution rationale, if resolved.
    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispute() -> Dispute {
        Dispute::new(
            DisputeId::new(),
            ContractId::of(b"agreement-001"),
            PrincipalId::new(),
            PrincipalId::new(),
        )
    }

    #[test]
    fn new_dispute_is_unresolved() {
        let d = dispute();
        assert!(!d.is_resolved());
        assert!(d.resolved_at().is_none());
        assert!(d.resolution().is_none());
    }

    #[test]
    fn resolution_happens_exactly_once() {
        let mut d = dispute();
        d.mark_resolved("deliverables met the acceptance criteria".into())
            .unwrap();
        assert!(d.is_resolved());
        assert!(d.resolved_at().is_some());
        assert_eq!(
            d.resolution(),
            Some("deliverables met the acceptance criteria")
        );

        let first_stamp = d.resolved_at();
        let err = d.mark_resolved("second opinion".into()).unwrap_err();
        assert_eq!(err, ArbitrationError::AlreadyResolved(d.id()));
        assert_eq!(d.resolved_at(), first_stamp);
        assert_eq!(
            d.resolution(),
            Some("deliverables met the acceptance criteria")
        );
    }

    #[test]
    fn serializes_roundtrip() {
        let mut d = dispute();
        d.mark_resolved("refund in full".into()).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let back: Dispute = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
