//! API 路由模块
//!
//! 每个资源一个子模块：`mod.rs` 负责路由装配，`handler.rs` 负责请求处理。

pub mod affiliate;
pub mod health;
pub mod loyalty;
pub mod payouts;
pub mod tiers;
pub mod vouchers;

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::SqlitePool;
    use tower::ServiceExt;

    use crate::core::{Config, Server, ServerState};
    use crate::db::repository::{member, redemption, voucher};
    use crate::db::repository::member::tests::seed_member;
    use crate::db::repository::tier::tests::seed_tiers;
    use crate::db::repository::voucher::tests::fixed_voucher;
    use crate::db::test_pool;

    async fn test_app() -> (Router, SqlitePool) {
        let pool = test_pool().await;
        let app = Server::build_router(ServerState::new(Config::from_env(), pool.clone()));
        (app, pool)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_public_loyalty_lookup_route() {
        let (app, pool) = test_app().await;
        seed_tiers(&pool).await;
        seed_member(&pool, "0901234567").await;

        let (status, json) = send(app, get_request("/api/public/loyalty/0901234567")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["memberInfo"]["phone"], "0901234567");
    }

    #[tokio::test]
    async fn test_staff_earn_wire_contract() {
        let (app, pool) = test_app().await;
        seed_tiers(&pool).await;
        seed_member(&pool, "0901234567").await;

        let req = json_request(
            "POST",
            "/api/public/staff/earn",
            r#"{"phone":"0901234567","amount":500000}"#,
        );
        let (status, json) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["pointsEarned"], 500);
        assert_eq!(json["data"]["redeemablePoints"], 500);
    }

    #[tokio::test]
    async fn test_admin_use_code_route() {
        let (app, pool) = test_app().await;
        seed_tiers(&pool).await;
        let linh = seed_member(&pool, "0901234567").await;
        member::earn_points(&pool, linh.id, 500_000, None).await.unwrap();
        let drink = voucher::create_voucher(&pool, fixed_voucher(100, 50_000)).await.unwrap();
        let redemption = redemption::redeem_voucher(&pool, linh.id, drink.id).await.unwrap();

        let req = json_request(
            "POST",
            "/api/admin/loyalty/use-code/0901234567",
            &format!(r#"{{"code":"{}"}}"#, redemption.voucher_code),
        );
        let (status, json) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "used");
    }

    #[tokio::test]
    async fn test_payout_paid_is_patch() {
        let (app, _pool) = test_app().await;

        let (status, json) = send(
            app.clone(),
            json_request("PATCH", "/api/admin/payouts/999/paid", ""),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["message"].is_string());

        let (status, _) = send(app, json_request("POST", "/api/admin/payouts/999/paid", "")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_order_review_routes_are_patch() {
        let (app, _pool) = test_app().await;

        for action in ["approve", "cancel"] {
            let uri = format!("/api/admin/affiliate/orders/999/{action}");
            let (status, json) = send(app.clone(), json_request("PATCH", &uri, "")).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(json["message"].is_string());

            let (status, _) = send(app.clone(), json_request("POST", &uri, "")).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        }
    }
}
