//! Loyalty Tier Repository

use shared::models::{LoyaltyTier, LoyaltyTierCreate, LoyaltyTierUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

/// All tiers ordered by ascending threshold
pub async fn list_tiers(pool: &SqlitePool) -> RepoResult<Vec<LoyaltyTier>> {
    let tiers = sqlx::query_as::<_, LoyaltyTier>(
        "SELECT * FROM loyalty_tier ORDER BY min_points ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(tiers)
}

pub async fn get_tier(pool: &SqlitePool, id: i64) -> RepoResult<LoyaltyTier> {
    sqlx::query_as::<_, LoyaltyTier>("SELECT * FROM loyalty_tier WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tier {id} not found")))
}

pub async fn create_tier(pool: &SqlitePool, payload: LoyaltyTierCreate) -> RepoResult<LoyaltyTier> {
    if payload.name.trim().is_empty() {
        return Err(RepoError::Validation("Tier name is required".to_string()));
    }
    if payload.min_points < 0 {
        return Err(RepoError::Validation(
            "min_points must not be negative".to_string(),
        ));
    }

    let id = snowflake_id();
    let now = now_millis();
    let result = sqlx::query(
        r#"
        INSERT INTO loyalty_tier (id, name, min_points, discount, point_multiplier, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(payload.min_points)
    .bind(payload.discount.unwrap_or(0.0))
    .bind(payload.point_multiplier.unwrap_or(1.0))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => get_tier(pool, id).await,
        Err(e) if super::is_unique_violation(&e) => Err(RepoError::DuplicateThreshold(format!(
            "A tier with min_points = {} already exists",
            payload.min_points
        ))),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_tier(
    pool: &SqlitePool,
    id: i64,
    payload: LoyaltyTierUpdate,
) -> RepoResult<LoyaltyTier> {
    if let Some(min_points) = payload.min_points
        && min_points < 0
    {
        return Err(RepoError::Validation(
            "min_points must not be negative".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        UPDATE loyalty_tier SET
            name = COALESCE(?, name),
            min_points = COALESCE(?, min_points),
            discount = COALESCE(?, discount),
            point_multiplier = COALESCE(?, point_multiplier),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(payload.name)
    .bind(payload.min_points)
    .bind(payload.discount)
    .bind(payload.point_multiplier)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => {
            Err(RepoError::NotFound(format!("Tier {id} not found")))
        }
        Ok(_) => get_tier(pool, id).await,
        Err(e) if super::is_unique_violation(&e) => Err(RepoError::DuplicateThreshold(
            "Another tier already uses that min_points threshold".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Delete a tier. Refused while any member still sits in it.
pub async fn delete_tier(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let members: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM member WHERE tier_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if members > 0 {
        return Err(RepoError::Conflict(format!(
            "Tier {id} still has {members} member(s)"
        )));
    }

    let result = sqlx::query("DELETE FROM loyalty_tier WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tier {id} not found")));
    }

    tx.commit().await?;
    Ok(())
}
