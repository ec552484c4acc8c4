//! Tier API 模块
//!
//! 会员等级与联盟佣金档位两套 CRUD。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/loyalty/tiers | GET | 会员等级列表（公开） |
//! | /api/admin/loyalty/tiers | POST | 新建会员等级 |
//! | /api/admin/loyalty/tiers/{id} | PATCH/DELETE | 编辑 / 删除会员等级 |
//! | /api/admin/affiliate/tiers | GET/POST | 佣金档位列表 / 新建 |
//! | /api/admin/affiliate/tiers/{id} | PATCH | 编辑佣金档位 |
//! | /api/admin/affiliate/delete-tiers/{id} | DELETE | 删除佣金档位 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/loyalty/tiers", get(handler::list_loyalty_tiers))
        .route("/api/admin/loyalty/tiers", post(handler::create_loyalty_tier))
        .route(
            "/api/admin/loyalty/tiers/{id}",
            patch(handler::update_loyalty_tier).delete(handler::delete_loyalty_tier),
        )
        .route(
            "/api/admin/affiliate/tiers",
            get(handler::list_affiliate_tiers).post(handler::create_affiliate_tier),
        )
        .route(
            "/api/admin/affiliate/tiers/{id}",
            patch(handler::update_affiliate_tier),
        )
        .route(
            "/api/admin/affiliate/delete-tiers/{id}",
            delete(handler::delete_affiliate_tier),
        )
}
