//! Affiliate Tier Repository

use shared::models::{AffiliateTier, AffiliateTierCreate, AffiliateTierUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

/// All commission brackets, lowest rate first
pub async fn list_tiers(pool: &SqlitePool) -> RepoResult<Vec<AffiliateTier>> {
    let tiers = sqlx::query_as::<_, AffiliateTier>(
        "SELECT * FROM affiliate_tier ORDER BY commission_rate ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(tiers)
}

pub async fn get_tier(pool: &SqlitePool, id: i64) -> RepoResult<AffiliateTier> {
    sqlx::query_as::<_, AffiliateTier>("SELECT * FROM affiliate_tier WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Affiliate tier {id} not found")))
}

pub async fn create_tier(
    pool: &SqlitePool,
    payload: AffiliateTierCreate,
) -> RepoResult<AffiliateTier> {
    if payload.name.trim().is_empty() {
        return Err(RepoError::Validation("Tier name is required".to_string()));
    }
    if !(0.0..=100.0).contains(&payload.commission_rate) {
        return Err(RepoError::Validation(
            "commission_rate must be between 0 and 100".to_string(),
        ));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO affiliate_tier (id, name, commission_rate, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(payload.commission_rate)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_tier(pool, id).await
}

pub async fn update_tier(
    pool: &SqlitePool,
    id: i64,
    payload: AffiliateTierUpdate,
) -> RepoResult<AffiliateTier> {
    if let Some(rate) = payload.commission_rate
        && !(0.0..=100.0).contains(&rate)
    {
        return Err(RepoError::Validation(
            "commission_rate must be between 0 and 100".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        UPDATE affiliate_tier SET
            name = COALESCE(?, name),
            commission_rate = COALESCE(?, commission_rate),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(payload.name)
    .bind(payload.commission_rate)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Affiliate tier {id} not found"
        )));
    }
    get_tier(pool, id).await
}

/// Delete a bracket. Refused while any affiliate still sits in it.
pub async fn delete_tier(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let affiliates: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affiliate WHERE tier_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if affiliates > 0 {
        return Err(RepoError::Conflict(format!(
            "Affiliate tier {id} still has {affiliates} affiliate(s)"
        )));
    }

    let result = sqlx::query("DELETE FROM affiliate_tier WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Affiliate tier {id} not found"
        )));
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::test_pool;

    /// Seed Standard 5% / Premium 8%, returning the seeded brackets
    pub(crate) async fn seed_affiliate_tiers(pool: &SqlitePool) -> Vec<AffiliateTier> {
        let mut out = Vec::new();
        for (name, rate) in [("Standard", 5.0), ("Premium", 8.0)] {
            out.push(
                create_tier(
                    pool,
                    AffiliateTierCreate {
                        name: name.to_string(),
                        commission_rate: rate,
                    },
                )
                .await
                .unwrap(),
            );
        }
        out
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = test_pool().await;
        seed_affiliate_tiers(&pool).await;

        let tiers = list_tiers(&pool).await.unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].name, "Standard");
        assert_eq!(tiers[1].commission_rate, 8.0);
    }

    #[tokio::test]
    async fn test_rate_bounds() {
        let pool = test_pool().await;
        let err = create_tier(
            &pool,
            AffiliateTierCreate {
                name: "Broken".to_string(),
                commission_rate: 120.0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rate() {
        let pool = test_pool().await;
        let tiers = seed_affiliate_tiers(&pool).await;

        let updated = update_tier(
            &pool,
            tiers[0].id,
            AffiliateTierUpdate {
                name: None,
                commission_rate: Some(6.0),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.commission_rate, 6.0);
        assert_eq!(updated.name, "Standard");
    }

    #[tokio::test]
    async fn test_delete_blocked_by_affiliates() {
        let pool = test_pool().await;
        let tiers = seed_affiliate_tiers(&pool).await;

        crate::db::repository::affiliate::register_affiliate(
            &pool,
            shared::models::AffiliateCreate {
                name: "Minh".to_string(),
                email: "minh@example.com".to_string(),
                user_id: None,
            },
        )
        .await
        .unwrap();

        // Registration lands in the lowest bracket
        let err = delete_tier(&pool, tiers[0].id).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
        delete_tier(&pool, tiers[1].id).await.unwrap();
    }
}
