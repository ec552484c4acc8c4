//! Tier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{affiliate_tier, tier};
use crate::utils::{AppResult, DataResponse, MessageResponse, data, message};
use shared::models::{
    AffiliateTier, AffiliateTierCreate, AffiliateTierUpdate, LoyaltyTier, LoyaltyTierCreate,
    LoyaltyTierUpdate,
};

/// GET /api/loyalty/tiers - 会员等级列表
pub async fn list_loyalty_tiers(
    State(state): State<ServerState>,
) -> AppResult<Json<DataResponse<Vec<LoyaltyTier>>>> {
    let tiers = tier::list_tiers(&state.pool).await?;
    Ok(data(tiers))
}

/// POST /api/admin/loyalty/tiers - 新建会员等级
pub async fn create_loyalty_tier(
    State(state): State<ServerState>,
    Json(payload): Json<LoyaltyTierCreate>,
) -> AppResult<Json<DataResponse<LoyaltyTier>>> {
    let tier = tier::create_tier(&state.pool, payload).await?;
    Ok(data(tier))
}

/// PATCH /api/admin/loyalty/tiers/{id} - 编辑会员等级
pub async fn update_loyalty_tier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<LoyaltyTierUpdate>,
) -> AppResult<Json<DataResponse<LoyaltyTier>>> {
    let tier = tier::update_tier(&state.pool, id, payload).await?;
    Ok(data(tier))
}

/// DELETE /api/admin/loyalty/tiers/{id} - 删除会员等级（仍有会员时拒绝）
pub async fn delete_loyalty_tier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    tier::delete_tier(&state.pool, id).await?;
    Ok(message(format!("Tier {id} deleted")))
}

/// GET /api/admin/affiliate/tiers - 佣金档位列表
pub async fn list_affiliate_tiers(
    State(state): State<ServerState>,
) -> AppResult<Json<DataResponse<Vec<AffiliateTier>>>> {
    let tiers = affiliate_tier::list_tiers(&state.pool).await?;
    Ok(data(tiers))
}

/// POST /api/admin/affiliate/tiers - 新建佣金档位
pub async fn create_affiliate_tier(
    State(state): State<ServerState>,
    Json(payload): Json<AffiliateTierCreate>,
) -> AppResult<Json<DataResponse<AffiliateTier>>> {
    let tier = affiliate_tier::create_tier(&state.pool, payload).await?;
    Ok(data(tier))
}

/// PATCH /api/admin/affiliate/tiers/{id} - 编辑佣金档位
///
/// 改动只影响之后入账的订单，已冻结的佣金不变。
pub async fn update_affiliate_tier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AffiliateTierUpdate>,
) -> AppResult<Json<DataResponse<AffiliateTier>>> {
    let tier = affiliate_tier::update_tier(&state.pool, id, payload).await?;
    Ok(data(tier))
}

/// DELETE /api/admin/affiliate/delete-tiers/{id} - 删除佣金档位
pub async fn delete_affiliate_tier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    affiliate_tier::delete_tier(&state.pool, id).await?;
    Ok(message(format!("Affiliate tier {id} deleted")))
}
