//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic runs on `Decimal` internally; values convert back to
//! `f64` for storage and serialization.

use rust_decimal::prelude::*;
use shared::PaymentStatus;

/// Rounding: 2 decimal places, half away from zero
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert an f64 into a Decimal (NaN/Infinity collapse to zero; inputs
/// are validated before they get here)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert a Decimal back to a rounded f64 for storage
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Sum a list of amounts with decimal precision
pub fn sum_amounts<'a, I>(amounts: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    let total = amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc + to_decimal(*a));
    to_f64(total)
}

/// Remaining balance after payments: `total - paid`
pub fn balance_amount(total: f64, paid: f64) -> f64 {
    to_f64(to_decimal(total) - to_decimal(paid))
}

/// Payment status from the paid/total relation: completed when paid
/// covers the total, partial when something but not everything is paid,
/// pending when nothing is.
pub fn compute_payment_status(total: f64, paid: f64) -> PaymentStatus {
    let total = to_decimal(total);
    let paid = to_decimal(paid);
    if paid <= Decimal::ZERO {
        PaymentStatus::Pending
    } else if paid + MONEY_TOLERANCE >= total {
        PaymentStatus::Completed
    } else {
        PaymentStatus::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_thresholds() {
        assert_eq!(compute_payment_status(1000.0, 0.0), PaymentStatus::Pending);
        assert_eq!(compute_payment_status(1000.0, 400.0), PaymentStatus::Partial);
        assert_eq!(
            compute_payment_status(1000.0, 1000.0),
            PaymentStatus::Completed
        );
        assert_eq!(
            compute_payment_status(1000.0, 1200.0),
            PaymentStatus::Completed
        );
    }

    #[test]
    fn tolerance_absorbs_float_noise() {
        // 0.1 + 0.2 style artifacts must not demote a full payment
        assert_eq!(
            compute_payment_status(0.3, 0.1 + 0.2),
            PaymentStatus::Completed
        );
    }

    #[test]
    fn balance_is_total_minus_paid() {
        assert_eq!(balance_amount(1500.0, 500.0), 1000.0);
        assert_eq!(balance_amount(500.0, 500.0), 0.0);
    }

    #[test]
    fn sums_with_decimal_precision() {
        assert_eq!(sum_amounts(&[0.1, 0.2]), 0.3);
        assert_eq!(sum_amounts(&[]), 0.0);
    }
}
