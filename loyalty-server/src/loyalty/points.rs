//! Point & Commission Arithmetic
//!
//! All money is integer VND; rates go through rust_decimal so no float
//! rounding leaks into balances.

use rust_decimal::prelude::*;

/// Base accrual rate: 1 point per 1,000 VND (before tier multiplier)
pub const VND_PER_POINT: i64 = 1_000;

/// Points earned for an order amount under a tier multiplier.
///
/// `floor(order_amount × multiplier / 1000)`, never negative.
pub fn points_for_amount(order_amount: i64, multiplier: f64) -> i64 {
    if order_amount <= 0 {
        return 0;
    }
    let multiplier = Decimal::from_f64(multiplier).unwrap_or(Decimal::ONE);
    let points = Decimal::from(order_amount) * multiplier / Decimal::from(VND_PER_POINT);
    points.floor().to_i64().unwrap_or(0).max(0)
}

/// Commission for an attributed order at a tier commission rate (percent).
///
/// `round(total_amount × rate / 100)`, half away from zero, never negative.
pub fn commission_for_order(total_amount: i64, rate_percent: f64) -> i64 {
    if total_amount <= 0 {
        return 0;
    }
    let rate = Decimal::from_f64(rate_percent).unwrap_or(Decimal::ZERO);
    let commission = Decimal::from(total_amount) * rate / Decimal::ONE_HUNDRED;
    commission
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
        .max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_multiplier_500k_vnd() {
        // 500,000 VND at ×1.0 → 500 points
        assert_eq!(points_for_amount(500_000, 1.0), 500);
    }

    #[test]
    fn test_multiplier_applies_before_floor() {
        // 500,000 × 1.5 / 1000 = 750
        assert_eq!(points_for_amount(500_000, 1.5), 750);
        // 1,500 × 1.2 / 1000 = 1.8 → 1
        assert_eq!(points_for_amount(1_500, 1.2), 1);
    }

    #[test]
    fn test_sub_thousand_amount_earns_nothing() {
        assert_eq!(points_for_amount(999, 1.0), 0);
    }

    #[test]
    fn test_non_positive_amount_earns_nothing() {
        assert_eq!(points_for_amount(0, 1.0), 0);
        assert_eq!(points_for_amount(-500_000, 1.0), 0);
    }

    #[test]
    fn test_commission_basic_rate() {
        // 2,000,000 VND at 5% → 100,000
        assert_eq!(commission_for_order(2_000_000, 5.0), 100_000);
    }

    #[test]
    fn test_commission_rounds_half_away_from_zero() {
        // 1,010 at 5% = 50.5 → 51
        assert_eq!(commission_for_order(1_010, 5.0), 51);
    }

    #[test]
    fn test_commission_zero_rate() {
        assert_eq!(commission_for_order(1_000_000, 0.0), 0);
    }

    #[test]
    fn test_commission_non_positive_amount() {
        assert_eq!(commission_for_order(0, 5.0), 0);
        assert_eq!(commission_for_order(-100, 5.0), 0);
    }
}
