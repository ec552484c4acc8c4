//! Loyalty API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{RepoError, member, redemption};
use crate::loyalty::apply_voucher_to_order;
use crate::utils::{AppError, AppResult, DataResponse, data};
use shared::models::{
    EarnResult, Member, MemberCreate, MemberSnapshot, OwnedVoucher, Redemption,
};

#[derive(Deserialize)]
pub struct PhoneQuery {
    pub phone: String,
}

/// GET /api/admin/loyalty/members - 获取所有会员
pub async fn list_members(
    State(state): State<ServerState>,
) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    let members = member::list_members(&state.pool).await?;
    Ok(data(members))
}

/// POST /api/admin/loyalty/members - 注册会员
pub async fn create_member(
    State(state): State<ServerState>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<DataResponse<Member>>> {
    let member = member::create_member(&state.pool, payload).await?;
    Ok(data(member))
}

/// GET /api/loyalty/members/lookup?phone=xxx - 按手机号返回会员快照
pub async fn lookup(
    State(state): State<ServerState>,
    Query(query): Query<PhoneQuery>,
) -> AppResult<Json<DataResponse<MemberSnapshot>>> {
    let snapshot = member::member_snapshot(&state.pool, &query.phone).await?;
    Ok(data(snapshot))
}

/// GET /api/public/loyalty/{phone}、/api/public/staff/lookup/{phone}
///
/// 顾客自助页和柜台共用同一份会员快照。
pub async fn snapshot_by_phone(
    State(state): State<ServerState>,
    Path(phone): Path<String>,
) -> AppResult<Json<DataResponse<MemberSnapshot>>> {
    let snapshot = member::member_snapshot(&state.pool, &phone).await?;
    Ok(data(snapshot))
}

#[derive(Deserialize)]
pub struct EarnRequest {
    pub phone: String,
    pub amount: i64,
    pub description: Option<String>,
}

/// POST /api/public/staff/earn - 按消费金额入账积分
pub async fn earn(
    State(state): State<ServerState>,
    Json(payload): Json<EarnRequest>,
) -> AppResult<Json<DataResponse<EarnResult>>> {
    let found = member::get_member_by_phone(&state.pool, &payload.phone).await?;
    let result =
        member::earn_points(&state.pool, found.id, payload.amount, payload.description).await?;
    Ok(data(result))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRedeemRequest {
    pub phone: String,
    pub voucher_id: i64,
}

/// POST /api/public/staff/redeem - 柜台代会员兑换
pub async fn staff_redeem(
    State(state): State<ServerState>,
    Json(payload): Json<StaffRedeemRequest>,
) -> AppResult<Json<DataResponse<Redemption>>> {
    let found = member::get_member_by_phone(&state.pool, &payload.phone).await?;
    let redemption = redemption::redeem_voucher(&state.pool, found.id, payload.voucher_id).await?;
    Ok(data(redemption))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfRedeemRequest {
    pub member_id: i64,
    pub voucher_id: i64,
}

/// POST /api/loyalty/redeem - 会员自助兑换
pub async fn self_redeem(
    State(state): State<ServerState>,
    Json(payload): Json<SelfRedeemRequest>,
) -> AppResult<Json<DataResponse<Redemption>>> {
    let redemption =
        redemption::redeem_voucher(&state.pool, payload.member_id, payload.voucher_id).await?;
    Ok(data(redemption))
}

#[derive(Deserialize)]
pub struct UseCodeRequest {
    pub code: String,
}

/// POST /api/admin/loyalty/use-code/{phone} - 核销兑换码
pub async fn use_code(
    State(state): State<ServerState>,
    Path(phone): Path<String>,
    Json(payload): Json<UseCodeRequest>,
) -> AppResult<Json<DataResponse<OwnedVoucher>>> {
    let used = redemption::use_code(&state.pool, &phone, &payload.code).await?;
    Ok(data(used))
}

#[derive(Deserialize)]
pub struct AdjustPointsRequest {
    pub amount: i64,
    pub description: Option<String>,
}

/// POST /api/admin/loyalty/members/adjust-points/{id} - 管理员调整积分
pub async fn adjust_points(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AdjustPointsRequest>,
) -> AppResult<Json<DataResponse<Member>>> {
    let member = member::adjust_points(&state.pool, id, payload.amount, payload.description).await?;
    Ok(data(member))
}

#[derive(Deserialize)]
pub struct ApplyVoucherRequest {
    pub code: String,
    pub subtotal: i64,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyVoucherResponse {
    pub discount: i64,
    pub final_total: i64,
}

/// POST /api/loyalty/apply-voucher - 试算兑换码在某笔订单上的折扣
///
/// 只读预览，不核销兑换码。
pub async fn apply_voucher(
    State(state): State<ServerState>,
    Json(payload): Json<ApplyVoucherRequest>,
) -> AppResult<Json<DataResponse<ApplyVoucherResponse>>> {
    if payload.subtotal <= 0 {
        return Err(AppError::Validation("subtotal must be positive".to_string()));
    }

    let owned = redemption::find_by_code(&state.pool, &payload.code).await?;
    match owned.redemption.status {
        shared::models::RedemptionStatus::Used => {
            return Err(RepoError::CodeAlreadyUsed(format!(
                "Code {} was already used",
                payload.code
            ))
            .into());
        }
        shared::models::RedemptionStatus::Expired => {
            return Err(
                RepoError::CodeExpired(format!("Code {} has expired", payload.code)).into(),
            );
        }
        shared::models::RedemptionStatus::Redeemed => {}
    }

    let voucher = owned.voucher.ok_or_else(|| {
        AppError::BusinessRule("The voucher behind this code is no longer in the catalog".to_string())
    })?;

    let discount = apply_voucher_to_order(&voucher, payload.subtotal)
        .map_err(|e| AppError::BusinessRule(e.to_string()))?;

    Ok(data(ApplyVoucherResponse {
        discount,
        final_total: payload.subtotal - discount,
    }))
}
