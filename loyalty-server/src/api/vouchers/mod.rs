//! Voucher Catalog API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/public/staff/vouchers?page=&limit= | GET | 分页目录 |
//! | /api/public/staff/create/vouchers | POST | 新建代金券 |
//! | /api/public/staff/edit/vouchers/{id} | PATCH | 编辑代金券 |
//! | /api/public/staff/delete/vouchers/{id} | DELETE | 硬删除代金券 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/public/staff",
        Router::new()
            .route("/vouchers", get(handler::list))
            .route("/create/vouchers", post(handler::create))
            .route("/edit/vouchers/{id}", patch(handler::update))
            .route("/delete/vouchers/{id}", delete(handler::remove)),
    )
}
