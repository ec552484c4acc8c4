//! Loyalty API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/public/loyalty/{phone} | GET | 会员快照（自助页主入口） |
//! | /api/loyalty/members/lookup?phone= | GET | 会员自助快照 |
//! | /api/loyalty/redeem | POST | 会员自助兑换 |
//! | /api/loyalty/apply-voucher | POST | 结账折扣试算 |
//! | /api/public/staff/lookup/{phone} | GET | 柜台查询会员 |
//! | /api/public/staff/earn | POST | 柜台积分入账 |
//! | /api/public/staff/redeem | POST | 柜台代兑换 |
//! | /api/admin/loyalty/members | GET/POST | 会员列表 / 注册 |
//! | /api/admin/loyalty/members/adjust-points/{id} | POST | 后台积分调整 |
//! | /api/admin/loyalty/use-code/{phone} | POST | 核销兑换码 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let member_routes = Router::new()
        .route("/members/lookup", get(handler::lookup))
        .route("/redeem", post(handler::self_redeem))
        .route("/apply-voucher", post(handler::apply_voucher));

    let staff_routes = Router::new()
        .route("/lookup/{phone}", get(handler::snapshot_by_phone))
        .route("/earn", post(handler::earn))
        .route("/redeem", post(handler::staff_redeem));

    let admin_routes = Router::new()
        .route("/members", get(handler::list_members).post(handler::create_member))
        .route("/members/adjust-points/{id}", post(handler::adjust_points))
        .route("/use-code/{phone}", post(handler::use_code));

    Router::new()
        .route("/api/public/loyalty/{phone}", get(handler::snapshot_by_phone))
        .nest("/api/loyalty", member_routes)
        .nest("/api/public/staff", staff_routes)
        .nest("/api/admin/loyalty", admin_routes)
}
