//! Redemption Model

use serde::{Deserialize, Serialize};

use super::{VoucherBenefit, VoucherStatus};

/// Lifecycle of a redeemed voucher instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum RedemptionStatus {
    /// Redeemed, code not yet presented at the counter
    Redeemed,
    Used,
    Expired,
}

/// Member ↔ voucher join record created at redemption time
///
/// `voucher_id` survives as None if the catalog entry is later deleted;
/// the generated `voucher_code` stays valid either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Redemption {
    pub id: i64,
    pub member_id: i64,
    pub voucher_id: Option<i64>,
    pub voucher_code: String,
    pub points_spent: i64,
    pub status: RedemptionStatus,
    pub used_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Voucher fields a redemption needs after the catalog entry may be gone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherSnapshot {
    pub id: i64,
    pub title: String,
    pub benefit: VoucherBenefit,
    pub value: i64,
    pub min_value: Option<i64>,
    pub max_discount: Option<i64>,
    pub valid_to: i64,
    pub status: VoucherStatus,
}

/// Redemption with its (possibly deleted) voucher resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedVoucher {
    #[serde(flatten)]
    pub redemption: Redemption,
    /// None when the voucher was deleted from the catalog
    pub voucher: Option<VoucherSnapshot>,
}
