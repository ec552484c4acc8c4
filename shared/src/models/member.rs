//! Member Model

use serde::{Deserialize, Serialize};

use super::{NextTierInfo, OwnedVoucher, PointHistory, Voucher};

/// Loyalty member entity
///
/// Balances are mutated only through earn/redeem/adjust repository
/// operations, never by direct field writes. `redeemable_points` never goes
/// below zero; `total_points` is lifetime accrual (admin corrections aside).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    /// Unique, used as the lookup key at the counter
    pub phone: String,
    pub total_points: i64,
    pub redeemable_points: i64,
    pub tier_id: i64,
    /// Channel of origin ("store", "web", "affiliate", ...)
    pub source: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCreate {
    pub name: String,
    pub phone: String,
    pub user_id: Option<i64>,
    pub source: Option<String>,
}

/// Member header returned by lookup endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub redeemable_points: i64,
    pub total_points: i64,
    /// Resolved tier name ("Bronze", "Silver", ...)
    pub tier: String,
}

/// Full member snapshot for the loyalty dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSnapshot {
    pub member_info: MemberInfo,
    /// None when the member already sits in the top tier
    pub next_tier_info: Option<NextTierInfo>,
    pub available_vouchers: Vec<Voucher>,
    pub owned_vouchers: Vec<OwnedVoucher>,
    pub point_history: Vec<PointHistory>,
}

/// Result of a staff earn operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnResult {
    pub member_id: i64,
    pub points_earned: i64,
    pub redeemable_points: i64,
}
