//! Voucher Catalog Repository
//!
//! Expiry is lazy: read paths sweep overdue active vouchers to `expired`
//! before answering, so no background job is needed. Redemption re-checks
//! the window inside its own transaction regardless.

use shared::models::{Voucher, VoucherBenefit, VoucherCreate, VoucherStatus, VoucherUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

/// Flip overdue active vouchers to expired
pub async fn expire_overdue(pool: &SqlitePool) -> RepoResult<u64> {
    let now = now_millis();
    let result = sqlx::query(
        "UPDATE voucher SET status = 'expired', updated_at = ? WHERE status = 'active' AND valid_to < ?",
    )
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn get_voucher(pool: &SqlitePool, id: i64) -> RepoResult<Voucher> {
    sqlx::query_as::<_, Voucher>("SELECT * FROM voucher WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Voucher {id} not found")))
}

/// Paged catalog listing, newest first. Returns (vouchers, total count).
pub async fn list_vouchers(
    pool: &SqlitePool,
    page: i64,
    limit: i64,
) -> RepoResult<(Vec<Voucher>, i64)> {
    expire_overdue(pool).await?;

    let page = page.max(1);
    let limit = limit.clamp(1, 100);

    let total: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM voucher")
        .fetch_one(pool)
        .await?;

    let vouchers = sqlx::query_as::<_, Voucher>(
        "SELECT * FROM voucher ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(pool)
    .await?;

    Ok((vouchers, total))
}

/// Vouchers a member can redeem right now: active, in window, in stock,
/// affordable with the given balance
pub async fn list_available(pool: &SqlitePool, redeemable_points: i64) -> RepoResult<Vec<Voucher>> {
    expire_overdue(pool).await?;

    let now = now_millis();
    let vouchers = sqlx::query_as::<_, Voucher>(
        r#"
        SELECT * FROM voucher
        WHERE status = 'active'
          AND remaining_quantity > 0
          AND valid_from <= ? AND valid_to >= ?
          AND points_required <= ?
        ORDER BY points_required ASC
        "#,
    )
    .bind(now)
    .bind(now)
    .bind(redeemable_points)
    .fetch_all(pool)
    .await?;
    Ok(vouchers)
}

fn validate_benefit(
    benefit: VoucherBenefit,
    value: i64,
    max_discount: Option<i64>,
) -> RepoResult<()> {
    match benefit {
        VoucherBenefit::Fixed if value <= 0 => Err(RepoError::Validation(
            "Fixed benefit value must be positive".to_string(),
        )),
        VoucherBenefit::Percentage if !(1..=100).contains(&value) => Err(RepoError::Validation(
            "Percentage benefit value must be between 1 and 100".to_string(),
        )),
        VoucherBenefit::Percentage if max_discount.is_some_and(|c| c <= 0) => Err(
            RepoError::Validation("max_discount must be positive".to_string()),
        ),
        _ => Ok(()),
    }
}

pub async fn create_voucher(pool: &SqlitePool, payload: VoucherCreate) -> RepoResult<Voucher> {
    if payload.title.trim().is_empty() {
        return Err(RepoError::Validation("Voucher title is required".to_string()));
    }
    if payload.points_required < 0 {
        return Err(RepoError::Validation(
            "points_required must not be negative".to_string(),
        ));
    }
    if payload.total_quantity <= 0 {
        return Err(RepoError::Validation(
            "total_quantity must be positive".to_string(),
        ));
    }
    if payload.valid_from >= payload.valid_to {
        return Err(RepoError::Validation(
            "valid_from must precede valid_to".to_string(),
        ));
    }
    validate_benefit(payload.benefit, payload.value, payload.max_discount)?;

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        r#"
        INSERT INTO voucher (id, title, description, points_required, total_quantity, remaining_quantity,
                             valid_from, valid_to, status, benefit, value, min_value, max_discount,
                             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(payload.title.trim())
    .bind(payload.description)
    .bind(payload.points_required)
    .bind(payload.total_quantity)
    .bind(payload.total_quantity)
    .bind(payload.valid_from)
    .bind(payload.valid_to)
    .bind(payload.status.unwrap_or(VoucherStatus::Active))
    .bind(payload.benefit)
    .bind(payload.value)
    .bind(payload.min_value)
    .bind(payload.max_discount)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_voucher(pool, id).await
}

/// Partial update. Raising or lowering `total_quantity` moves
/// `remaining_quantity` by the same delta (floored at zero).
pub async fn update_voucher(
    pool: &SqlitePool,
    id: i64,
    payload: VoucherUpdate,
) -> RepoResult<Voucher> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Voucher>("SELECT * FROM voucher WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Voucher {id} not found")))?;

    let benefit = payload.benefit.unwrap_or(current.benefit);
    let value = payload.value.unwrap_or(current.value);
    let max_discount = payload.max_discount.or(current.max_discount);
    validate_benefit(benefit, value, max_discount)?;

    let valid_from = payload.valid_from.unwrap_or(current.valid_from);
    let valid_to = payload.valid_to.unwrap_or(current.valid_to);
    if valid_from >= valid_to {
        return Err(RepoError::Validation(
            "valid_from must precede valid_to".to_string(),
        ));
    }

    let total_quantity = payload.total_quantity.unwrap_or(current.total_quantity);
    if total_quantity <= 0 {
        return Err(RepoError::Validation(
            "total_quantity must be positive".to_string(),
        ));
    }
    let remaining = (current.remaining_quantity + total_quantity - current.total_quantity)
        .clamp(0, total_quantity);

    sqlx::query(
        r#"
        UPDATE voucher SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            points_required = COALESCE(?, points_required),
            total_quantity = ?,
            remaining_quantity = ?,
            valid_from = ?,
            valid_to = ?,
            status = COALESCE(?, status),
            benefit = ?,
            value = ?,
            min_value = COALESCE(?, min_value),
            max_discount = COALESCE(?, max_discount),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(payload.title)
    .bind(payload.description)
    .bind(payload.points_required)
    .bind(total_quantity)
    .bind(remaining)
    .bind(valid_from)
    .bind(valid_to)
    .bind(payload.status)
    .bind(benefit)
    .bind(value)
    .bind(payload.min_value)
    .bind(payload.max_discount)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_voucher(pool, id).await
}

/// Hard delete. Existing redemptions keep their codes; their `voucher_id`
/// becomes NULL via the foreign key.
pub async fn delete_voucher(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM voucher WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Voucher {id} not found")));
    }
    Ok(())
}
