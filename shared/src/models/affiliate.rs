//! Affiliate Program Models

use serde::{Deserialize, Serialize};

/// Affiliate tier — commission bracket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AffiliateTier {
    pub id: i64,
    pub name: String,
    /// Percent of order total credited as commission (e.g. 5.0)
    pub commission_rate: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create affiliate tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateTierCreate {
    pub name: String,
    pub commission_rate: f64,
}

/// Update affiliate tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateTierUpdate {
    pub name: Option<String>,
    pub commission_rate: Option<f64>,
}

/// Referral partner entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Affiliate {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub referral_code: String,
    pub tier_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Register affiliate payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateCreate {
    pub name: String,
    pub email: String,
    pub user_id: Option<i64>,
}

/// Status of an order attributed to a referral
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AffiliateOrderStatus {
    Pending,
    /// Commission credited; the only state reachable from an approval
    Completed,
    Canceled,
    Rejected,
}

/// Sale attributed to an affiliate's referral code
///
/// `commission_amount` is computed once at order time from the affiliate's
/// tier rate and never recomputed afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AffiliateOrder {
    pub id: i64,
    pub affiliate_id: i64,
    pub order_ref: String,
    pub total_amount: i64,
    pub commission_amount: i64,
    pub status: AffiliateOrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Ingest an attributed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateOrderCreate {
    pub referral_code: String,
    pub order_ref: String,
    pub total_amount: i64,
}

/// Aggregates for the affiliate dashboard
///
/// `total_commission_balance` = Σ completed commissions − Σ (approved + paid)
/// payout amounts. All fields derive from order/payout/click records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AffiliateSummary {
    pub total_commission_balance: i64,
    pub total_sales: i64,
    pub pending_request: i64,
    pub approved_waiting_payment: i64,
    pub paid_total: i64,
    #[serde(rename = "totalClicks")]
    pub total_clicks: i64,
    #[serde(rename = "totalOrders")]
    pub total_orders: i64,
    /// completed orders / clicks, 0.0 when no clicks recorded
    #[serde(rename = "conversionRate")]
    pub conversion_rate: f64,
}

/// Public referral stats (clicks + attributed orders)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateStats {
    pub referral_code: String,
    pub clicks: i64,
    pub orders: i64,
}
