//! End-to-end settlement flows through the factory: dual-approval
//! release, arbiter-forced settlement, and staged partial payouts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pacta_core::{ContractId, PrincipalId};
use pacta_custody::{CustodyError, CustodyEvent, EscrowFactory, EscrowState};

struct Deployment {
    custody: EscrowFactory,
    arbiter: PrincipalId,
    depositor: PrincipalId,
    beneficiary: PrincipalId,
    contract: ContractId,
}

fn deployment() -> Deployment {
    let owner = PrincipalId::new();
    let arbiter = PrincipalId::new();
    let custody = EscrowFactory::new(owner, arbiter).unwrap();

    let depositor = PrincipalId::new();
    let beneficiary = PrincipalId::new();
    let contract = ContractId::of(b"consulting-agreement-2026-001");
    custody
        .create_escrow(contract, depositor, beneficiary)
        .unwrap();

    Deployment {
        custody,
        arbiter,
        depositor,
        beneficiary,
        contract,
    }
}

#[test]
fn happy_path_dual_approval_settlement() {
    let d = deployment();
    d.custody
        .deposit(d.contract, d.depositor, dec!(5000))
        .unwrap();

    // First approval holds the funds in place.
    let event = d.custody.release(d.contract, d.depositor).unwrap();
    assert!(matches!(event, CustodyEvent::ApprovalRecorded { .. }));
    let escrow = d.custody.get_escrow(d.contract).unwrap();
    assert_eq!(escrow.state(), EscrowState::Funded);
    assert_eq!(escrow.balance(), dec!(5000));

    // The counterparty's approval completes the pair and pays out.
    let event = d.custody.release(d.contract, d.beneficiary).unwrap();
    assert!(matches!(
        event,
        CustodyEvent::Released { to, amount, .. }
            if to == d.beneficiary && amount == dec!(5000)
    ));

    let escrow = d.custody.get_escrow(d.contract).unwrap();
    assert!(escrow.state().is_terminal());
    assert_eq!(escrow.balance(), Decimal::ZERO);
}

#[test]
fn consensual_refund_needs_both_approvals_first() {
    let d = deployment();
    d.custody
        .deposit(d.contract, d.depositor, dec!(5000))
        .unwrap();

    assert_eq!(
        d.custody.refund(d.contract, d.depositor),
        Err(CustodyError::ApprovalsRequired)
    );

    d.custody.release(d.contract, d.depositor).unwrap();
    // One approval is still not mutual consent.
    assert_eq!(
        d.custody.refund(d.contract, d.depositor),
        Err(CustodyError::ApprovalsRequired)
    );
}

#[test]
fn arbiter_settles_over_a_missing_approval() {
    let d = deployment();
    d.custody
        .deposit(d.contract, d.depositor, dec!(1200))
        .unwrap();
    d.custody.release(d.contract, d.beneficiary).unwrap();

    // The depositor never approves; the arbiter refunds regardless.
    let event = d.custody.refund(d.contract, d.arbiter).unwrap();
    assert!(matches!(
        event,
        CustodyEvent::Refunded { to, amount, .. }
            if to == d.depositor && amount == dec!(1200)
    ));
    assert_eq!(
        d.custody.get_escrow(d.contract).unwrap().state(),
        EscrowState::Refunded
    );
}

#[test]
fn staged_milestone_payouts_then_final_settlement() {
    let d = deployment();
    d.custody
        .deposit(d.contract, d.depositor, dec!(9000))
        .unwrap();

    // Three milestones of 3000, each releasing a tranche.
    d.custody
        .release_partial(d.contract, d.arbiter, dec!(3000))
        .unwrap();
    d.custody
        .release_partial(d.contract, d.arbiter, dec!(3000))
        .unwrap();
    let escrow = d.custody.get_escrow(d.contract).unwrap();
    assert_eq!(escrow.state(), EscrowState::Funded);
    assert_eq!(escrow.balance(), dec!(3000));

    let event = d
        .custody
        .release_partial(d.contract, d.arbiter, dec!(3000))
        .unwrap();
    assert!(matches!(event, CustodyEvent::Released { .. }));

    // The audit trail accounts for every unit deposited.
    let escrow = d.custody.get_escrow(d.contract).unwrap();
    let paid: Decimal = escrow.events().iter().filter_map(|e| e.payout()).sum();
    assert_eq!(paid, dec!(9000));
    assert_eq!(escrow.state(), EscrowState::Released);
}

#[test]
fn settled_escrow_is_inert_but_contract_stays_indexed() {
    let d = deployment();
    d.custody
        .deposit(d.contract, d.depositor, dec!(100))
        .unwrap();
    d.custody.release(d.contract, d.arbiter).unwrap();

    assert!(d.custody.deposit(d.contract, d.depositor, dec!(1)).is_err());
    assert!(d.custody.freeze(d.contract, d.arbiter).is_err());

    // The record stays queryable and the id stays taken.
    assert!(d.custody.get_escrow(d.contract).is_some());
    assert_eq!(
        d.custody
            .create_escrow(d.contract, d.depositor, d.beneficiary),
        Err(CustodyError::DuplicateContract(d.contract))
    );
}

#[test]
fn factory_isolates_escrows_per_contract() {
    let d = deployment();
    let other_contract = ContractId::of(b"consulting-agreement-2026-002");
    let other_depositor = PrincipalId::new();
    d.custody
        .create_escrow(other_contract, other_depositor, d.beneficiary)
        .unwrap();

    d.custody
        .deposit(d.contract, d.depositor, dec!(100))
        .unwrap();
    d.custody
        .deposit(other_contract, other_depositor, dec!(200))
        .unwrap();
    d.custody.freeze(d.contract, d.arbiter).unwrap();

    // The freeze touched only its own escrow.
    assert_eq!(
        d.custody.get_escrow(d.contract).unwrap().state(),
        EscrowState::Frozen
    );
    let other = d.custody.get_escrow(other_contract).unwrap();
    assert_eq!(other.state(), EscrowState::Funded);
    assert_eq!(other.balance(), dec!(200));
    assert_eq!(d.custody.escrow_count(), 2);
}
