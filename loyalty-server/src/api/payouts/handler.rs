//! Payout API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::payout;
use crate::utils::{AppResult, DataResponse, data};
use shared::models::{Payout, PayoutStatus};

#[derive(Deserialize)]
pub struct PayoutRequest {
    pub amount: i64,
}

/// POST /api/affiliate/{id}/request-payout - 发起提现
///
/// 申请即预留额度：可用余额在事务内计算。
pub async fn request_payout(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PayoutRequest>,
) -> AppResult<Json<DataResponse<Payout>>> {
    let payout = payout::request_payout(&state.pool, id, payload.amount).await?;
    Ok(data(payout))
}

/// GET /api/affiliate/{id}/payouts - 伙伴提现记录
pub async fn list_for_affiliate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DataResponse<Vec<Payout>>>> {
    crate::db::repository::affiliate::get_affiliate(&state.pool, id).await?;
    let payouts = payout::list_for_affiliate(&state.pool, id).await?;
    Ok(data(payouts))
}

/// GET /api/admin/payouts - 审批队列（最早申请在前）
pub async fn list_all(
    State(state): State<ServerState>,
) -> AppResult<Json<DataResponse<Vec<Payout>>>> {
    let payouts = payout::list_all(&state.pool).await?;
    Ok(data(payouts))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: PayoutStatus,
}

/// PATCH /api/admin/payouts/{id}/status - 审批提现申请
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Payout>>> {
    let payout = payout::set_status(&state.pool, id, payload.status).await?;
    Ok(data(payout))
}

/// PATCH /api/admin/payouts/{id}/paid - 标记已打款（终态）
pub async fn mark_paid(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DataResponse<Payout>>> {
    let payout = payout::mark_paid(&state.pool, id).await?;
    Ok(data(payout))
}
