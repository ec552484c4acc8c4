//! Voucher Catalog API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::voucher;
use crate::utils::{AppResult, DataResponse, MessageResponse, data, message};
use shared::models::{Voucher, VoucherCreate, VoucherUpdate};

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// 分页目录响应
#[derive(Serialize)]
pub struct VoucherPage {
    pub data: Vec<Voucher>,
    pub pagination: Pagination,
}

#[derive(Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// GET /api/public/staff/vouchers?page=&limit= - 分页目录
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<VoucherPage>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let (vouchers, total) = voucher::list_vouchers(&state.pool, page, limit).await?;
    Ok(Json(VoucherPage {
        data: vouchers,
        pagination: Pagination { page, limit, total },
    }))
}

/// POST /api/public/staff/create/vouchers - 新建代金券
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<VoucherCreate>,
) -> AppResult<Json<DataResponse<Voucher>>> {
    let voucher = voucher::create_voucher(&state.pool, payload).await?;
    Ok(data(voucher))
}

/// PATCH /api/public/staff/edit/vouchers/{id} - 编辑代金券
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<VoucherUpdate>,
) -> AppResult<Json<DataResponse<Voucher>>> {
    let voucher = voucher::update_voucher(&state.pool, id, payload).await?;
    Ok(data(voucher))
}

/// DELETE /api/public/staff/delete/vouchers/{id} - 硬删除；已兑换的码不受影响
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    voucher::delete_voucher(&state.pool, id).await?;
    Ok(message(format!("Voucher {id} deleted")))
}
