//! Voucher Catalog Model

use serde::{Deserialize, Serialize};

/// Catalog status of a voucher
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum VoucherStatus {
    Active,
    Inactive,
    Expired,
}

/// Benefit kind applied at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum VoucherBenefit {
    /// Subtract `value` VND from the subtotal
    Fixed,
    /// Subtract `value`% of the subtotal, capped by `max_discount`
    Percentage,
}

/// Voucher catalog entry
///
/// Redeemable only while `status = active`, `remaining_quantity > 0` and
/// now is within `[valid_from, valid_to]`. Stock is decremented atomically
/// with the member's point balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Voucher {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub total_quantity: i64,
    pub remaining_quantity: i64,
    pub valid_from: i64,
    pub valid_to: i64,
    pub status: VoucherStatus,
    pub benefit: VoucherBenefit,
    /// VND for fixed benefit, percent for percentage benefit
    pub value: i64,
    /// Minimum order subtotal (VND) required to apply the voucher
    pub min_value: Option<i64>,
    /// Cap (VND) for percentage benefit
    pub max_discount: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create voucher payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherCreate {
    pub title: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub total_quantity: i64,
    pub valid_from: i64,
    pub valid_to: i64,
    pub benefit: VoucherBenefit,
    pub value: i64,
    pub min_value: Option<i64>,
    pub max_discount: Option<i64>,
    pub status: Option<VoucherStatus>,
}

/// Update voucher payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points_required: Option<i64>,
    pub total_quantity: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_to: Option<i64>,
    pub benefit: Option<VoucherBenefit>,
    pub value: Option<i64>,
    pub min_value: Option<i64>,
    pub max_discount: Option<i64>,
    pub status: Option<VoucherStatus>,
}
