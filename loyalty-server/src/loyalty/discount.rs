//! Voucher Discount Application
//!
//! Checkout-side discount math for a redeemed voucher against an order
//! subtotal. Pure; the validity of the redemption itself (status, window)
//! is the caller's concern.

use shared::models::{VoucherBenefit, VoucherSnapshot, VoucherStatus};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    #[error("Voucher is not active")]
    NotActive,

    #[error("Order subtotal below voucher minimum of {min_value} VND")]
    BelowMinValue { min_value: i64 },
}

/// Discount (VND) a voucher grants on `subtotal`.
///
/// - fixed: subtract `value`
/// - percentage: subtract `subtotal × value / 100`, capped by `max_discount`
///
/// The result is clamped to `[0, subtotal]`.
pub fn apply_voucher_to_order(
    voucher: &VoucherSnapshot,
    subtotal: i64,
) -> Result<i64, DiscountError> {
    if voucher.status != VoucherStatus::Active {
        return Err(DiscountError::NotActive);
    }

    if let Some(min_value) = voucher.min_value
        && subtotal < min_value
    {
        return Err(DiscountError::BelowMinValue { min_value });
    }

    let raw = match voucher.benefit {
        VoucherBenefit::Fixed => voucher.value,
        VoucherBenefit::Percentage => {
            let pct = subtotal * voucher.value / 100;
            match voucher.max_discount {
                Some(cap) => pct.min(cap),
                None => pct,
            }
        }
    };

    Ok(raw.clamp(0, subtotal.max(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::VoucherBenefit;

    fn make_snapshot(
        benefit: VoucherBenefit,
        value: i64,
        min_value: Option<i64>,
        max_discount: Option<i64>,
    ) -> VoucherSnapshot {
        VoucherSnapshot {
            id: 1,
            title: "Test voucher".to_string(),
            benefit,
            value,
            min_value,
            max_discount,
            valid_to: i64::MAX,
            status: VoucherStatus::Active,
        }
    }

    #[test]
    fn test_fixed_discount() {
        let v = make_snapshot(VoucherBenefit::Fixed, 50_000, None, None);
        assert_eq!(apply_voucher_to_order(&v, 1_000_000).unwrap(), 50_000);
    }

    #[test]
    fn test_fixed_discount_clamped_to_subtotal() {
        let v = make_snapshot(VoucherBenefit::Fixed, 150_000, None, None);
        assert_eq!(apply_voucher_to_order(&v, 100_000).unwrap(), 100_000);
    }

    #[test]
    fn test_percentage_capped_by_max_discount() {
        // 10% of 1,000,000 = 100,000, capped at 50,000
        let v = make_snapshot(VoucherBenefit::Percentage, 10, None, Some(50_000));
        assert_eq!(apply_voucher_to_order(&v, 1_000_000).unwrap(), 50_000);
    }

    #[test]
    fn test_percentage_without_cap() {
        let v = make_snapshot(VoucherBenefit::Percentage, 10, None, None);
        assert_eq!(apply_voucher_to_order(&v, 1_000_000).unwrap(), 100_000);
    }

    #[test]
    fn test_percentage_under_cap() {
        let v = make_snapshot(VoucherBenefit::Percentage, 10, None, Some(50_000));
        assert_eq!(apply_voucher_to_order(&v, 200_000).unwrap(), 20_000);
    }

    #[test]
    fn test_below_min_value_rejected() {
        let v = make_snapshot(VoucherBenefit::Fixed, 50_000, Some(500_000), None);
        assert_eq!(
            apply_voucher_to_order(&v, 300_000),
            Err(DiscountError::BelowMinValue { min_value: 500_000 })
        );
    }

    #[test]
    fn test_min_value_exact_boundary_allowed() {
        let v = make_snapshot(VoucherBenefit::Fixed, 50_000, Some(500_000), None);
        assert_eq!(apply_voucher_to_order(&v, 500_000).unwrap(), 50_000);
    }

    #[test]
    fn test_inactive_voucher_rejected() {
        let mut v = make_snapshot(VoucherBenefit::Fixed, 50_000, None, None);
        v.status = VoucherStatus::Inactive;
        assert_eq!(apply_voucher_to_order(&v, 1_000_000), Err(DiscountError::NotActive));
    }

    #[test]
    fn test_zero_subtotal_yields_zero() {
        let v = make_snapshot(VoucherBenefit::Percentage, 10, None, None);
        assert_eq!(apply_voucher_to_order(&v, 0).unwrap(), 0);
    }
}
