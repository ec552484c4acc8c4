//! Point History Model

use serde::{Deserialize, Serialize};

/// Direction of a point ledger entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PointEntryType {
    Earn,
    Spend,
}

/// Append-only point ledger entry
///
/// Never mutated or deleted after creation; it is the audit trail that
/// reconciles `redeemable_points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PointHistory {
    pub id: i64,
    pub member_id: i64,
    #[serde(rename = "type")]
    pub entry_type: PointEntryType,
    /// Signed: positive for earn, negative for spend
    pub amount: i64,
    /// "order", "redeem_voucher", "admin_adjustment", ...
    pub source: String,
    pub ref_id: Option<i64>,
    pub description: String,
    pub created_at: i64,
}
