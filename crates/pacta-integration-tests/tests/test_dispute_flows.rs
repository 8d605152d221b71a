//! End-to-end dispute flows: filing freezes the escrow, resolution pays
//! out through custody, and the freeze stays best-effort.

use rust_decimal_macros::dec;

use pacta_arbitration::{ArbitrationError, ArbitrationEvent, ArbitrationManager};
use pacta_core::{ContractId, DisputeId, PrincipalId};
use pacta_custody::{CustodyError, EscrowFactory, EscrowState};

struct Deployment {
    custody: EscrowFactory,
    arbitration: ArbitrationManager,
    owner: PrincipalId,
    depositor: PrincipalId,
    beneficiary: PrincipalId,
    contract: ContractId,
}

/// Wire the stack the way a deployment wires it: the arbitration
/// manager's authority principal is the default arbiter of every escrow
/// the factory creates, so the manager can freeze and settle them.
fn deployment() -> Deployment {
    let owner = PrincipalId::new();
    let arbitration = ArbitrationManager::new(PrincipalId::new(), owner).unwrap();
    let custody = EscrowFactory::new(owner, arbitration.authority()).unwrap();

    let depositor = PrincipalId::new();
    let beneficiary = PrincipalId::new();
    let contract = ContractId::of(b"consulting-agreement-2026-001");
    custody
        .create_escrow(contract, depositor, beneficiary)
        .unwrap();
    custody.deposit(contract, depositor, dec!(4000)).unwrap();

    Deployment {
        custody,
        arbitration,
        owner,
        depositor,
        beneficiary,
        contract,
    }
}

fn file(d: &Deployment, dispute_id: DisputeId) -> ArbitrationEvent {
    d.arbitration
        .file_dispute(
            &d.custody,
            d.depositor,
            dispute_id,
            d.contract,
            d.depositor,
            d.beneficiary,
        )
        .unwrap()
}

#[test]
fn dispute_filed_by_a_party_freezes_settlement() {
    let d = deployment();
    let dispute_id = DisputeId::new();
    let event = file(&d, dispute_id);
    assert!(matches!(
        event,
        ArbitrationEvent::DisputeFiled { escrow_frozen: true, .. }
    ));
    assert_eq!(
        d.custody.get_escrow(d.contract).unwrap().state(),
        EscrowState::Frozen
    );

    // Normal dual-approval settlement is suspended while frozen.
    assert!(matches!(
        d.custody.release(d.contract, d.beneficiary),
        Err(CustodyError::InvalidState { .. })
    ));
}

#[test]
fn resolution_in_favor_of_the_beneficiary_pays_out() {
    let d = deployment();
    let dispute_id = DisputeId::new();
    file(&d, dispute_id);

    let event = d
        .arbitration
        .resolve_dispute(
            &d.custody,
            d.owner,
            dispute_id,
            "deliverables accepted on review",
            true,
        )
        .unwrap();
    assert!(matches!(
        event,
        ArbitrationEvent::DisputeResolved { amount: Some(paid), .. } if paid == dec!(4000)
    ));

    let escrow = d.custody.get_escrow(d.contract).unwrap();
    assert_eq!(escrow.state(), EscrowState::Released);

    let dispute = d.arbitration.get_dispute(dispute_id).unwrap();
    assert!(dispute.is_resolved());
    assert_eq!(dispute.resolution(), Some("deliverables accepted on review"));
}

#[test]
fn resolution_in_favor_of_the_depositor_refunds() {
    let d = deployment();
    let dispute_id = DisputeId::new();
    file(&d, dispute_id);

    d.arbitration
        .resolve_dispute(&d.custody, d.owner, dispute_id, "work abandoned", false)
        .unwrap();
    assert_eq!(
        d.custody.get_escrow(d.contract).unwrap().state(),
        EscrowState::Refunded
    );
}

#[test]
fn second_resolution_fails_and_moves_no_funds() {
    let d = deployment();
    let dispute_id = DisputeId::new();
    file(&d, dispute_id);

    d.arbitration
        .resolve_dispute(&d.custody, d.owner, dispute_id, "first ruling", true)
        .unwrap();
    let err = d
        .arbitration
        .resolve_dispute(&d.custody, d.owner, dispute_id, "second ruling", false)
        .unwrap_err();
    assert_eq!(err, ArbitrationError::AlreadyResolved(dispute_id));

    // Funds went to the beneficiary once and stayed there.
    let escrow = d.custody.get_escrow(d.contract).unwrap();
    assert_eq!(escrow.state(), EscrowState::Released);
    assert_eq!(
        d.arbitration.get_dispute(dispute_id).unwrap().resolution(),
        Some("first ruling")
    );
}

#[test]
fn dispute_against_a_settled_escrow_still_files() {
    // The freeze inside filing is best-effort. An escrow that already
    // settled cannot be frozen, but the grievance is still recorded; the
    // ruling then has nothing to move and fails cleanly.
    let d = deployment();
    d.custody
        .release(d.contract, d.arbitration.authority())
        .unwrap();

    let dispute_id = DisputeId::new();
    let event = file(&d, dispute_id);
    assert!(matches!(
        event,
        ArbitrationEvent::DisputeFiled { escrow_frozen: false, .. }
    ));
    assert!(d.arbitration.get_dispute(dispute_id).is_some());
    assert_eq!(
        d.custody.get_escrow(d.contract).unwrap().state(),
        EscrowState::Released
    );

    let err = d
        .arbitration
        .resolve_dispute(&d.custody, d.owner, dispute_id, "moot", true)
        .unwrap_err();
    assert!(matches!(err, ArbitrationError::Custody(_)));
    assert!(!d.arbitration.get_dispute(dispute_id).unwrap().is_resolved());
}

#[test]
fn duplicate_dispute_id_leaves_the_original_untouched() {
    let d = deployment();
    let dispute_id = DisputeId::new();
    file(&d, dispute_id);
    let original = d.arbitration.get_dispute(dispute_id).unwrap();

    let err = d
        .arbitration
        .file_dispute(
            &d.custody,
            d.beneficiary,
            dispute_id,
            d.contract,
            d.beneficiary,
            d.depositor,
        )
        .unwrap_err();
    assert_eq!(err, ArbitrationError::DuplicateDispute(dispute_id));
    assert_eq!(d.arbitration.get_dispute(dispute_id).unwrap(), original);
    assert_eq!(d.arbitration.dispute_count(), 1);
}

#[test]
fn delegated_arbiter_resolves_but_cannot_administer() {
    let d = deployment();
    let dispute_id = DisputeId::new();
    file(&d, dispute_id);

    let arbiter = PrincipalId::new();
    d.arbitration.set_arbiter(d.owner, arbiter).unwrap();

    // Arbiter authority covers resolution, not administration.
    assert!(matches!(
        d.arbitration.set_arbiter(arbiter, PrincipalId::new()),
        Err(ArbitrationError::Unauthorized { .. })
    ));
    assert!(matches!(
        d.arbitration.transfer_ownership(arbiter, arbiter),
        Err(ArbitrationError::Unauthorized { .. })
    ));

    d.arbitration
        .resolve_dispute(&d.custody, arbiter, dispute_id, "split ruled out", true)
        .unwrap();
    assert!(d.arbitration.get_dispute(dispute_id).unwrap().is_resolved());
}

#[test]
fn owner_retains_resolution_authority_after_delegation() {
    let d = deployment();
    let dispute_id = DisputeId::new();
    file(&d, dispute_id);

    d.arbitration
        .set_arbiter(d.owner, PrincipalId::new())
        .unwrap();
    d.arbitration
        .resolve_dispute(&d.custody, d.owner, dispute_id, "owner ruling", false)
        .unwrap();
    assert_eq!(
        d.custody.get_escrow(d.contract).unwrap().state(),
        EscrowState::Refunded
    );
}
