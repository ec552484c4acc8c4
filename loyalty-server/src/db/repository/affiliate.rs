//! Affiliate Repository
//!
//! Referral partners, click tracking, attributed orders and dashboard
//! aggregates. Commission is computed once at order ingest from the
//! affiliate's bracket and frozen on the order row.

use shared::models::{
    Affiliate, AffiliateCreate, AffiliateOrder, AffiliateOrderCreate, AffiliateOrderStatus,
    AffiliateStats, AffiliateSummary,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::loyalty::{commission_for_order, generate_referral_code};

const CODE_ATTEMPTS: usize = 5;

pub async fn get_affiliate(pool: &SqlitePool, id: i64) -> RepoResult<Affiliate> {
    sqlx::query_as::<_, Affiliate>("SELECT * FROM affiliate WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Affiliate {id} not found")))
}

pub async fn get_affiliate_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Affiliate> {
    sqlx::query_as::<_, Affiliate>("SELECT * FROM affiliate WHERE referral_code = ?")
        .bind(code)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("No affiliate with referral code {code}")))
}

pub async fn list_affiliates(pool: &SqlitePool) -> RepoResult<Vec<Affiliate>> {
    let affiliates =
        sqlx::query_as::<_, Affiliate>("SELECT * FROM affiliate ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
    Ok(affiliates)
}

/// Register a partner in the lowest commission bracket with a fresh
/// referral code
pub async fn register_affiliate(pool: &SqlitePool, payload: AffiliateCreate) -> RepoResult<Affiliate> {
    if payload.name.trim().is_empty() {
        return Err(RepoError::Validation("Name is required".to_string()));
    }
    let email = payload.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(RepoError::Validation("A valid email is required".to_string()));
    }

    let tier_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM affiliate_tier ORDER BY commission_rate ASC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::Conflict("No affiliate tiers configured".to_string()))?;

    let now = now_millis();
    for _ in 0..CODE_ATTEMPTS {
        let id = snowflake_id();
        let code = generate_referral_code();
        let result = sqlx::query(
            r#"
            INSERT INTO affiliate (id, user_id, name, email, referral_code, tier_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(payload.user_id)
        .bind(payload.name.trim())
        .bind(&email)
        .bind(&code)
        .bind(tier_id)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await;

        match result {
            Ok(_) => return get_affiliate(pool, id).await,
            Err(e) if super::is_unique_violation(&e) => {
                // Email collisions are the caller's fault; code collisions get a retry
                let email_taken = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM affiliate WHERE email = ?",
                )
                .bind(&email)
                .fetch_one(pool)
                .await?;
                if email_taken > 0 {
                    return Err(RepoError::Conflict(format!(
                        "An affiliate with email {email} already exists"
                    )));
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(RepoError::Conflict(
        "Could not allocate a unique referral code".to_string(),
    ))
}

/// Record one click on a referral link
pub async fn track_click(pool: &SqlitePool, referral_code: &str) -> RepoResult<()> {
    let affiliate = get_affiliate_by_code(pool, referral_code).await?;
    sqlx::query("INSERT INTO affiliate_click (id, affiliate_id, created_at) VALUES (?, ?, ?)")
        .bind(snowflake_id())
        .bind(affiliate.id)
        .bind(now_millis())
        .execute(pool)
        .await?;
    Ok(())
}

/// Public counters for a referral code
pub async fn referral_stats(pool: &SqlitePool, referral_code: &str) -> RepoResult<AffiliateStats> {
    let affiliate = get_affiliate_by_code(pool, referral_code).await?;

    let clicks: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affiliate_click WHERE affiliate_id = ?")
            .bind(affiliate.id)
            .fetch_one(pool)
            .await?;
    let orders: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affiliate_order WHERE affiliate_id = ?")
            .bind(affiliate.id)
            .fetch_one(pool)
            .await?;

    Ok(AffiliateStats {
        referral_code: affiliate.referral_code,
        clicks,
        orders,
    })
}

/// Ingest a sale attributed to a referral code. Commission is frozen at
/// the affiliate's current bracket rate.
pub async fn create_order(
    pool: &SqlitePool,
    payload: AffiliateOrderCreate,
) -> RepoResult<AffiliateOrder> {
    if payload.total_amount <= 0 {
        return Err(RepoError::InvalidAmount(
            "Order total must be positive".to_string(),
        ));
    }
    if payload.order_ref.trim().is_empty() {
        return Err(RepoError::Validation("order_ref is required".to_string()));
    }

    let mut tx = pool.begin().await?;

    let affiliate = sqlx::query_as::<_, Affiliate>(
        "SELECT * FROM affiliate WHERE referral_code = ?",
    )
    .bind(&payload.referral_code)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        RepoError::NotFound(format!(
            "No affiliate with referral code {}",
            payload.referral_code
        ))
    })?;

    let rate: f64 =
        sqlx::query_scalar::<_, f64>("SELECT commission_rate FROM affiliate_tier WHERE id = ?")
            .bind(affiliate.tier_id)
            .fetch_one(&mut *tx)
            .await?;
    let commission = commission_for_order(payload.total_amount, rate);

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        r#"
        INSERT INTO affiliate_order (id, affiliate_id, order_ref, total_amount, commission_amount, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'pending', ?, ?)
        "#,
    )
    .bind(id)
    .bind(affiliate.id)
    .bind(payload.order_ref.trim())
    .bind(payload.total_amount)
    .bind(commission)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_order(pool, id).await
}

pub async fn get_order(pool: &SqlitePool, id: i64) -> RepoResult<AffiliateOrder> {
    sqlx::query_as::<_, AffiliateOrder>("SELECT * FROM affiliate_order WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Affiliate order {id} not found")))
}

/// Orders for one affiliate, newest first; `status` narrows when given
pub async fn list_orders(
    pool: &SqlitePool,
    affiliate_id: i64,
    status: Option<AffiliateOrderStatus>,
) -> RepoResult<Vec<AffiliateOrder>> {
    let orders = match status {
        Some(status) => {
            sqlx::query_as::<_, AffiliateOrder>(
                "SELECT * FROM affiliate_order WHERE affiliate_id = ? AND status = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(affiliate_id)
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, AffiliateOrder>(
                "SELECT * FROM affiliate_order WHERE affiliate_id = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(affiliate_id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(orders)
}

/// All orders across affiliates for the admin view
pub async fn list_all_orders(pool: &SqlitePool) -> RepoResult<Vec<AffiliateOrder>> {
    let orders = sqlx::query_as::<_, AffiliateOrder>(
        "SELECT * FROM affiliate_order ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Approve a pending order, crediting its commission. Idempotence guard:
/// a second approval finds zero pending rows and reports it.
pub async fn approve_order(pool: &SqlitePool, order_id: i64) -> RepoResult<AffiliateOrder> {
    let result = sqlx::query(
        "UPDATE affiliate_order SET status = 'completed', updated_at = ? WHERE id = ? AND status = 'pending'",
    )
    .bind(now_millis())
    .bind(order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let order = get_order(pool, order_id).await?;
        return Err(RepoError::AlreadyProcessed(format!(
            "Order {order_id} is already {:?}",
            order.status
        )));
    }
    get_order(pool, order_id).await
}

/// Cancel a pending order before any commission is credited
pub async fn cancel_order(pool: &SqlitePool, order_id: i64) -> RepoResult<AffiliateOrder> {
    let result = sqlx::query(
        "UPDATE affiliate_order SET status = 'canceled', updated_at = ? WHERE id = ? AND status = 'pending'",
    )
    .bind(now_millis())
    .bind(order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let order = get_order(pool, order_id).await?;
        return Err(RepoError::InvalidTransition(format!(
            "Order {order_id} is {:?} and can no longer be canceled",
            order.status
        )));
    }
    get_order(pool, order_id).await
}

/// Dashboard aggregates; every figure derives from order/payout/click rows
pub async fn affiliate_summary(pool: &SqlitePool, affiliate_id: i64) -> RepoResult<AffiliateSummary> {
    get_affiliate(pool, affiliate_id).await?;

    #[derive(sqlx::FromRow)]
    struct OrderAgg {
        total_commission: i64,
        total_sales: i64,
        total_orders: i64,
        completed_orders: i64,
    }
    let orders = sqlx::query_as::<_, OrderAgg>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN status = 'completed' THEN commission_amount END), 0) AS total_commission,
            COALESCE(SUM(CASE WHEN status = 'completed' THEN total_amount END), 0) AS total_sales,
            COUNT(*) AS total_orders,
            COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 END), 0) AS completed_orders
        FROM affiliate_order WHERE affiliate_id = ?
        "#,
    )
    .bind(affiliate_id)
    .fetch_one(pool)
    .await?;

    #[derive(sqlx::FromRow)]
    struct PayoutAgg {
        requested: i64,
        approved: i64,
        paid: i64,
    }
    let payouts = sqlx::query_as::<_, PayoutAgg>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN status = 'requested' THEN amount END), 0) AS requested,
            COALESCE(SUM(CASE WHEN status = 'approved' THEN amount END), 0) AS approved,
            COALESCE(SUM(CASE WHEN status = 'paid' THEN amount END), 0) AS paid
        FROM payout WHERE affiliate_id = ?
        "#,
    )
    .bind(affiliate_id)
    .fetch_one(pool)
    .await?;

    let clicks: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affiliate_click WHERE affiliate_id = ?")
            .bind(affiliate_id)
            .fetch_one(pool)
            .await?;

    let conversion_rate = if clicks > 0 {
        orders.completed_orders as f64 / clicks as f64
    } else {
        0.0
    };

    Ok(AffiliateSummary {
        total_commission_balance: orders.total_commission - payouts.approved - payouts.paid,
        total_sales: orders.total_sales,
        pending_request: payouts.requested,
        approved_waiting_payment: payouts.approved,
        paid_total: payouts.paid,
        total_clicks: clicks,
        total_orders: orders.total_orders,
        conversion_rate,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::repository::affiliate_tier::tests::seed_affiliate_tiers;
    use crate::db::test_pool;

    pub(crate) async fn seed_affiliate(pool: &SqlitePool, email: &str) -> Affiliate {
        register_affiliate(
            pool,
            AffiliateCreate {
                name: "Minh".to_string(),
                email: email.to_string(),
                user_id: None,
            },
        )
        .await
        .unwrap()
    }

    pub(crate) async fn seed_completed_order(
        pool: &SqlitePool,
        referral_code: &str,
        total_amount: i64,
    ) -> AffiliateOrder {
        let order = create_order(
            pool,
            AffiliateOrderCreate {
                referral_code: referral_code.to_string(),
                order_ref: format!("ORD-{}", snowflake_id()),
                total_amount,
            },
        )
        .await
        .unwrap();
        approve_order(pool, order.id).await.unwrap()
    }

    #[tokio::test]
    async fn test_register_assigns_code_and_lowest_bracket() {
        let pool = test_pool().await;
        let tiers = seed_affiliate_tiers(&pool).await;

        let affiliate = seed_affiliate(&pool, "minh@example.com").await;
        assert_eq!(affiliate.tier_id, tiers[0].id);
        assert_eq!(affiliate.referral_code.len(), 8);
        assert_eq!(affiliate.email, "minh@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;
        seed_affiliate(&pool, "minh@example.com").await;

        let err = register_affiliate(
            &pool,
            AffiliateCreate {
                name: "Other".to_string(),
                email: "Minh@Example.com".to_string(),
                user_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_order_freezes_commission_at_ingest_rate() {
        // 2,000,000 VND at 5% → 100,000 commission
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;
        let affiliate = seed_affiliate(&pool, "minh@example.com").await;

        let order = create_order(
            &pool,
            AffiliateOrderCreate {
                referral_code: affiliate.referral_code.clone(),
                order_ref: "ORD-1".to_string(),
                total_amount: 2_000_000,
            },
        )
        .await
        .unwrap();
        assert_eq!(order.commission_amount, 100_000);
        assert_eq!(order.status, AffiliateOrderStatus::Pending);

        // A later rate change must not touch the frozen amount
        crate::db::repository::affiliate_tier::update_tier(
            &pool,
            affiliate.tier_id,
            shared::models::AffiliateTierUpdate {
                name: None,
                commission_rate: Some(10.0),
            },
        )
        .await
        .unwrap();
        let order = get_order(&pool, order.id).await.unwrap();
        assert_eq!(order.commission_amount, 100_000);
    }

    #[tokio::test]
    async fn test_approve_is_not_repeatable() {
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;
        let affiliate = seed_affiliate(&pool, "minh@example.com").await;
        let order = create_order(
            &pool,
            AffiliateOrderCreate {
                referral_code: affiliate.referral_code.clone(),
                order_ref: "ORD-1".to_string(),
                total_amount: 1_000_000,
            },
        )
        .await
        .unwrap();

        let approved = approve_order(&pool, order.id).await.unwrap();
        assert_eq!(approved.status, AffiliateOrderStatus::Completed);

        let err = approve_order(&pool, order.id).await.unwrap_err();
        assert!(matches!(err, RepoError::AlreadyProcessed(_)));

        // Commission not double-credited
        let summary = affiliate_summary(&pool, affiliate.id).await.unwrap();
        assert_eq!(summary.total_commission_balance, 50_000);
    }

    #[tokio::test]
    async fn test_cancel_only_from_pending() {
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;
        let affiliate = seed_affiliate(&pool, "minh@example.com").await;
        let order = seed_completed_order(&pool, &affiliate.referral_code, 1_000_000).await;

        let err = cancel_order(&pool, order.id).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_click_tracking_and_stats() {
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;
        let affiliate = seed_affiliate(&pool, "minh@example.com").await;

        for _ in 0..4 {
            track_click(&pool, &affiliate.referral_code).await.unwrap();
        }
        seed_completed_order(&pool, &affiliate.referral_code, 1_000_000).await;

        let stats = referral_stats(&pool, &affiliate.referral_code).await.unwrap();
        assert_eq!(stats.clicks, 4);
        assert_eq!(stats.orders, 1);

        let err = track_click(&pool, "NOPE1234").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_summary_aggregates() {
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;
        let affiliate = seed_affiliate(&pool, "minh@example.com").await;

        for _ in 0..2 {
            track_click(&pool, &affiliate.referral_code).await.unwrap();
        }
        seed_completed_order(&pool, &affiliate.referral_code, 2_000_000).await;
        // A pending order counts toward totals but not balance
        create_order(
            &pool,
            AffiliateOrderCreate {
                referral_code: affiliate.referral_code.clone(),
                order_ref: "ORD-PENDING".to_string(),
                total_amount: 500_000,
            },
        )
        .await
        .unwrap();

        let summary = affiliate_summary(&pool, affiliate.id).await.unwrap();
        assert_eq!(summary.total_commission_balance, 100_000);
        assert_eq!(summary.total_sales, 2_000_000);
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_clicks, 2);
        assert_eq!(summary.conversion_rate, 0.5);
    }

    #[tokio::test]
    async fn test_summary_no_clicks_no_division() {
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;
        let affiliate = seed_affiliate(&pool, "minh@example.com").await;

        let summary = affiliate_summary(&pool, affiliate.id).await.unwrap();
        assert_eq!(summary.conversion_rate, 0.0);
    }
}
