//! Affiliate API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/auth/register-affiliate | POST | 注册推广伙伴 |
//! | /api/track?ref= | GET | 记录推广链接点击 |
//! | /api/stats/{code} | GET | 推广码公开统计 |
//! | /api/affiliate/orders | POST | 归因订单入账 |
//! | /api/affiliate/{id}/summary | GET | 伙伴仪表盘汇总 |
//! | /api/affiliate/{id}/orders | GET | 伙伴订单列表 |
//! | /api/admin/affiliate/orders | GET | 全部归因订单 |
//! | /api/admin/affiliate/orders/{id}/approve | PATCH | 审批通过 |
//! | /api/admin/affiliate/orders/{id}/cancel | PATCH | 取消待审订单 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register-affiliate", post(handler::register))
        .route("/api/track", get(handler::track))
        .route("/api/stats/{code}", get(handler::stats))
        .route("/api/affiliate/orders", post(handler::create_order))
        .route("/api/affiliate/{id}/summary", get(handler::summary))
        .route("/api/affiliate/{id}/orders", get(handler::list_orders))
        .route("/api/admin/affiliate/orders", get(handler::list_all_orders))
        .route(
            "/api/admin/affiliate/orders/{id}/approve",
            patch(handler::approve_order),
        )
        .route(
            "/api/admin/affiliate/orders/{id}/cancel",
            patch(handler::cancel_order),
        )
}
