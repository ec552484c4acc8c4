//! Loyalty Tier Model

use serde::{Deserialize, Serialize};

/// Loyalty tier entity
///
/// Ordered reference data keyed by ascending `min_points`. Exactly one tier
/// matches any point total: the highest tier whose `min_points` does not
/// exceed the member's lifetime points. Thresholds are unique (enforced at
/// creation time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoyaltyTier {
    pub id: i64,
    pub name: String,
    pub min_points: i64,
    /// Checkout discount percentage granted by this tier
    pub discount: f64,
    /// Multiplier applied to base point accrual
    pub point_multiplier: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyTierCreate {
    pub name: String,
    pub min_points: i64,
    pub discount: Option<f64>,
    pub point_multiplier: Option<f64>,
}

/// Update tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyTierUpdate {
    pub name: Option<String>,
    pub min_points: Option<i64>,
    pub discount: Option<f64>,
    pub point_multiplier: Option<f64>,
}

/// Next-higher tier and the point gap to reach it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NextTierInfo {
    pub name: String,
    pub points_needed: i64,
}
