//! # pacta-fees — Deterministic Fee Formulas
//!
//! Pure, side-effect-free monetary formulas invoked by both the payment
//! ledger and dispute intake. Both services must call *this* crate — a
//! second implementation would drift at the rounding boundary.
//!
//! All amounts are [`rust_decimal::Decimal`]. Financial amounts are never
//! represented as floating-point numbers; every result is rounded to two
//! decimal places using half-up rounding at the cent.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Flat late-payment fine rate (jurisdiction-capped).
pub const LATE_FINE_RATE: Decimal = dec!(0.02);

/// Simple monthly interest rate applied to late payments.
pub const MONTHLY_INTEREST_RATE: Decimal = dec!(0.01);

/// Days per month used for daily interest proration.
pub const DAYS_PER_MONTH: Decimal = dec!(30);

/// Escrow service fee rate.
pub const ESCROW_FEE_RATE: Decimal = dec!(0.015);

/// Arbitration intake fee rate on the disputed value.
pub const ARBITRATION_FEE_RATE: Decimal = dec!(0.05);

/// Minimum arbitration fee.
pub const ARBITRATION_FEE_FLOOR: Decimal = dec!(150);

/// Maximum arbitration fee.
pub const ARBITRATION_FEE_CEILING: Decimal = dec!(2000);

/// Breakdown of a late-payment charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFee {
    /// Flat fine component.
    pub fine: Decimal,
    /// Prorated simple interest component.
    pub interest: Decimal,
    /// Original amount plus fine plus interest.
    pub total: Decimal,
}

/// Round to two decimal places with half-up (midpoint away from zero)
/// rounding at the cent.
fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the late-payment charge on `amount` after `days_late` days.
///
/// If `days_late` is zero or negative, nothing is owed beyond the original
/// amount. Otherwise the fine is a flat 2% and interest accrues at 1% per
/// month, simple, prorated daily over a 30-day month. All three components
/// are rounded to the cent.
pub fn late_fee(amount: Decimal, days_late: i64) -> LateFee {
    if days_late <= 0 {
        return LateFee {
            fine: Decimal::ZERO,
            interest: Decimal::ZERO,
            total: amount,
        };
    }
    let fine = round_cents(amount * LATE_FINE_RATE);
    let interest = round_cents(
        amount * MONTHLY_INTEREST_RATE * Decimal::from(days_late) / DAYS_PER_MONTH,
    );
    LateFee {
        fine,
        interest,
        total: round_cents(amount + fine + interest),
    }
}

/// Compute the escrow service fee on `amount`, rounded to the cent.
pub fn escrow_fee(amount: Decimal) -> Decimal {
    round_cents(amount * ESCROW_FEE_RATE)
}

/// Compute the arbitration intake fee on `dispute_value`: 5% of the
/// disputed value, rounded to the cent, clamped to the [150, 2000] band.
pub fn arbitration_fee(dispute_value: Decimal) -> Decimal {
    round_cents(dispute_value * ARBITRATION_FEE_RATE)
        .clamp(ARBITRATION_FEE_FLOOR, ARBITRATION_FEE_CEILING)
}
