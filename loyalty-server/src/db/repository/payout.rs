//! Payout Repository
//!
//! Withdrawal requests against an affiliate's commission balance. A live
//! request reserves its amount: available = Σ completed commission −
//! Σ (requested + approved + paid) payout amounts, computed inside the
//! request transaction so racing requests cannot over-reserve.

use shared::models::{Payout, PayoutStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

pub async fn get_payout(pool: &SqlitePool, id: i64) -> RepoResult<Payout> {
    sqlx::query_as::<_, Payout>("SELECT * FROM payout WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payout {id} not found")))
}

pub async fn list_for_affiliate(pool: &SqlitePool, affiliate_id: i64) -> RepoResult<Vec<Payout>> {
    let payouts = sqlx::query_as::<_, Payout>(
        "SELECT * FROM payout WHERE affiliate_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(affiliate_id)
    .fetch_all(pool)
    .await?;
    Ok(payouts)
}

/// All payouts for the admin queue, oldest request first
pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<Payout>> {
    let payouts =
        sqlx::query_as::<_, Payout>("SELECT * FROM payout ORDER BY created_at ASC, id ASC")
            .fetch_all(pool)
            .await?;
    Ok(payouts)
}

/// Request a withdrawal. The amount must fit within the unreserved
/// commission balance at this instant.
pub async fn request_payout(
    pool: &SqlitePool,
    affiliate_id: i64,
    amount: i64,
) -> RepoResult<Payout> {
    if amount <= 0 {
        return Err(RepoError::InvalidAmount(
            "Payout amount must be positive".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM affiliate WHERE id = ?")
        .bind(affiliate_id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Err(RepoError::NotFound(format!(
            "Affiliate {affiliate_id} not found"
        )));
    }

    let earned: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(commission_amount), 0) FROM affiliate_order WHERE affiliate_id = ? AND status = 'completed'",
    )
    .bind(affiliate_id)
    .fetch_one(&mut *tx)
    .await?;
    let reserved: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(amount), 0) FROM payout WHERE affiliate_id = ? AND status IN ('requested', 'approved', 'paid')",
    )
    .bind(affiliate_id)
    .fetch_one(&mut *tx)
    .await?;

    let available = earned - reserved;
    if amount > available {
        return Err(RepoError::InsufficientBalance(format!(
            "Requested {amount} VND but only {available} VND is available"
        )));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO payout (id, affiliate_id, amount, status, created_at, updated_at) VALUES (?, ?, ?, 'requested', ?, ?)",
    )
    .bind(id)
    .bind(affiliate_id)
    .bind(amount)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_payout(pool, id).await
}

/// Review a request: approve or reject. Only a `requested` payout moves.
pub async fn set_status(
    pool: &SqlitePool,
    payout_id: i64,
    target: PayoutStatus,
) -> RepoResult<Payout> {
    if !PayoutStatus::Requested.can_transition(target) {
        return Err(RepoError::InvalidTransition(format!(
            "A review can only approve or reject, not set {target:?}"
        )));
    }

    let result = sqlx::query(
        "UPDATE payout SET status = ?, updated_at = ? WHERE id = ? AND status = 'requested'",
    )
    .bind(target)
    .bind(now_millis())
    .bind(payout_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let payout = get_payout(pool, payout_id).await?;
        return Err(RepoError::InvalidTransition(format!(
            "Payout {payout_id} is {:?}, not requested",
            payout.status
        )));
    }
    get_payout(pool, payout_id).await
}

/// Settle an approved payout. This is the moment the balance is debited
/// for good; the reservation simply becomes permanent.
pub async fn mark_paid(pool: &SqlitePool, payout_id: i64) -> RepoResult<Payout> {
    let result = sqlx::query(
        "UPDATE payout SET status = 'paid', updated_at = ? WHERE id = ? AND status = 'approved'",
    )
    .bind(now_millis())
    .bind(payout_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let payout = get_payout(pool, payout_id).await?;
        return Err(RepoError::InvalidTransition(format!(
            "Payout {payout_id} is {:?}, not approved",
            payout.status
        )));
    }
    get_payout(pool, payout_id).await
}
