//! Payout API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/affiliate/{id}/request-payout | POST | 发起提现申请 |
//! | /api/affiliate/{id}/payouts | GET | 伙伴提现记录 |
//! | /api/admin/payouts | GET | 提现审批队列 |
//! | /api/admin/payouts/{id}/status | PATCH | 审批：approved / rejected |
//! | /api/admin/payouts/{id}/paid | PATCH | 标记已打款 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/affiliate/{id}/request-payout",
            post(handler::request_payout),
        )
        .route("/api/affiliate/{id}/payouts", get(handler::list_for_affiliate))
        .route("/api/admin/payouts", get(handler::list_all))
        .route("/api/admin/payouts/{id}/status", patch(handler::set_status))
        .route("/api/admin/payouts/{id}/paid", patch(handler::mark_paid))
}
