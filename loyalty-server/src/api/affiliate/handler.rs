//! Affiliate API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::affiliate;
use crate::utils::{AppResult, DataResponse, MessageResponse, data, message};
use shared::models::{
    Affiliate, AffiliateCreate, AffiliateOrder, AffiliateOrderCreate, AffiliateOrderStatus,
    AffiliateStats, AffiliateSummary,
};

/// POST /api/auth/register-affiliate - 注册推广伙伴
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<AffiliateCreate>,
) -> AppResult<Json<DataResponse<Affiliate>>> {
    let affiliate = affiliate::register_affiliate(&state.pool, payload).await?;
    Ok(data(affiliate))
}

#[derive(Deserialize)]
pub struct TrackQuery {
    #[serde(rename = "ref")]
    pub referral_code: String,
}

/// GET /api/track?ref=CODE - 记录一次推广链接点击
pub async fn track(
    State(state): State<ServerState>,
    Query(query): Query<TrackQuery>,
) -> AppResult<Json<MessageResponse>> {
    affiliate::track_click(&state.pool, &query.referral_code).await?;
    Ok(message("Click recorded"))
}

/// GET /api/stats/{code} - 推广码公开统计
pub async fn stats(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<AffiliateStats>>> {
    let stats = affiliate::referral_stats(&state.pool, &code).await?;
    Ok(data(stats))
}

/// POST /api/affiliate/orders - 归因订单入账（佣金按当前档位冻结）
pub async fn create_order(
    State(state): State<ServerState>,
    Json(payload): Json<AffiliateOrderCreate>,
) -> AppResult<Json<DataResponse<AffiliateOrder>>> {
    let order = affiliate::create_order(&state.pool, payload).await?;
    Ok(data(order))
}

/// GET /api/affiliate/{id}/summary - 仪表盘汇总
pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DataResponse<AffiliateSummary>>> {
    let summary = affiliate::affiliate_summary(&state.pool, id).await?;
    Ok(data(summary))
}

#[derive(Deserialize)]
pub struct OrderFilter {
    pub status: Option<AffiliateOrderStatus>,
}

/// GET /api/affiliate/{id}/orders?status= - 伙伴订单列表
pub async fn list_orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<DataResponse<Vec<AffiliateOrder>>>> {
    affiliate::get_affiliate(&state.pool, id).await?;
    let orders = affiliate::list_orders(&state.pool, id, filter.status).await?;
    Ok(data(orders))
}

/// GET /api/admin/affiliate/orders - 全部归因订单
pub async fn list_all_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<DataResponse<Vec<AffiliateOrder>>>> {
    let orders = affiliate::list_all_orders(&state.pool).await?;
    Ok(data(orders))
}

/// PATCH /api/admin/affiliate/orders/{id}/approve - 审批通过，佣金入账
pub async fn approve_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DataResponse<AffiliateOrder>>> {
    let order = affiliate::approve_order(&state.pool, id).await?;
    Ok(data(order))
}

/// PATCH /api/admin/affiliate/orders/{id}/cancel - 取消待审订单
pub async fn cancel_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DataResponse<AffiliateOrder>>> {
    let order = affiliate::cancel_order(&state.pool, id).await?;
    Ok(data(order))
}
