//! Redemption Repository
//!
//! Redeeming a voucher swaps points for a unique code. Stock and balance
//! move in one transaction; either both guards pass or nothing commits.

use shared::models::{
    OwnedVoucher, PointEntryType, Redemption, RedemptionStatus, Voucher, VoucherBenefit,
    VoucherSnapshot, VoucherStatus,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, point_history};
use crate::loyalty::generate_voucher_code;

const CODE_ATTEMPTS: usize = 5;

pub async fn get_redemption(pool: &SqlitePool, id: i64) -> RepoResult<Redemption> {
    sqlx::query_as::<_, Redemption>("SELECT * FROM redemption WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Redemption {id} not found")))
}

/// Exchange points for a voucher code.
///
/// Both guards are WHERE clauses: the stock decrement requires
/// `remaining_quantity > 0`, the balance debit requires
/// `redeemable_points >= points_required`. A zero row count aborts the
/// transaction with the matching business error.
pub async fn redeem_voucher(
    pool: &SqlitePool,
    member_id: i64,
    voucher_id: i64,
) -> RepoResult<Redemption> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    let voucher = sqlx::query_as::<_, Voucher>("SELECT * FROM voucher WHERE id = ?")
        .bind(voucher_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Voucher {voucher_id} not found")))?;

    if voucher.status == VoucherStatus::Expired || voucher.valid_to < now {
        return Err(RepoError::VoucherExpired(format!(
            "Voucher '{}' has expired",
            voucher.title
        )));
    }
    if voucher.status != VoucherStatus::Active || voucher.valid_from > now {
        return Err(RepoError::VoucherUnavailable(format!(
            "Voucher '{}' is not currently redeemable",
            voucher.title
        )));
    }

    let stock = sqlx::query(
        "UPDATE voucher SET remaining_quantity = remaining_quantity - 1, updated_at = ? WHERE id = ? AND remaining_quantity > 0",
    )
    .bind(now)
    .bind(voucher_id)
    .execute(&mut *tx)
    .await?;
    if stock.rows_affected() == 0 {
        return Err(RepoError::VoucherUnavailable(format!(
            "Voucher '{}' is out of stock",
            voucher.title
        )));
    }

    let debit = sqlx::query(
        "UPDATE member SET redeemable_points = redeemable_points - ?, updated_at = ? WHERE id = ? AND redeemable_points >= ?",
    )
    .bind(voucher.points_required)
    .bind(now)
    .bind(member_id)
    .bind(voucher.points_required)
    .execute(&mut *tx)
    .await?;
    if debit.rows_affected() == 0 {
        // Distinguish a missing member from a short balance
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM member WHERE id = ?")
            .bind(member_id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(format!("Member {member_id} not found")));
        }
        return Err(RepoError::InsufficientPoints(format!(
            "Voucher '{}' requires {} points",
            voucher.title, voucher.points_required
        )));
    }

    // UNIQUE column backs up the in-transaction collision check
    let mut code = None;
    for _ in 0..CODE_ATTEMPTS {
        let candidate = generate_voucher_code();
        let taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM redemption WHERE voucher_code = ?")
                .bind(&candidate)
                .fetch_one(&mut *tx)
                .await?;
        if taken == 0 {
            code = Some(candidate);
            break;
        }
    }
    let code = code.ok_or_else(|| {
        RepoError::Conflict("Could not allocate a unique voucher code".to_string())
    })?;

    let redemption_id = snowflake_id();
    sqlx::query(
        r#"
        INSERT INTO redemption (id, member_id, voucher_id, voucher_code, points_spent, status, used_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'redeemed', NULL, ?, ?)
        "#,
    )
    .bind(redemption_id)
    .bind(member_id)
    .bind(voucher_id)
    .bind(&code)
    .bind(voucher.points_required)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if voucher.points_required > 0 {
        point_history::insert_entry(
            &mut tx,
            member_id,
            PointEntryType::Spend,
            -voucher.points_required,
            "redeem_voucher",
            Some(redemption_id),
            &format!("Redeemed '{}'", voucher.title),
        )
        .await?;
    }

    tx.commit().await?;

    get_redemption(pool, redemption_id).await
}

/// Mark a code used at the counter. The code must belong to the member
/// identified by `phone` and still be live.
pub async fn use_code(pool: &SqlitePool, phone: &str, code: &str) -> RepoResult<OwnedVoucher> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    let redemption = sqlx::query_as::<_, Redemption>(
        r#"
        SELECT r.* FROM redemption r
        JOIN member m ON m.id = r.member_id
        WHERE r.voucher_code = ? AND m.phone = ?
        "#,
    )
    .bind(code)
    .bind(phone)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("No voucher code {code} for that member")))?;

    match redemption.status {
        RedemptionStatus::Used => {
            return Err(RepoError::CodeAlreadyUsed(format!(
                "Code {code} was already used"
            )));
        }
        RedemptionStatus::Expired => {
            return Err(RepoError::CodeExpired(format!("Code {code} has expired")));
        }
        RedemptionStatus::Redeemed => {}
    }

    // A surviving voucher bounds the code's life; a deleted one does not
    if let Some(voucher_id) = redemption.voucher_id {
        let valid_to =
            sqlx::query_scalar::<_, i64>("SELECT valid_to FROM voucher WHERE id = ?")
                .bind(voucher_id)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some(valid_to) = valid_to
            && valid_to < now
        {
            sqlx::query(
                "UPDATE redemption SET status = 'expired', updated_at = ? WHERE id = ?",
            )
            .bind(now)
            .bind(redemption.id)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            return Err(RepoError::CodeExpired(format!("Code {code} has expired")));
        }
    }

    let result = sqlx::query(
        "UPDATE redemption SET status = 'used', used_at = ?, updated_at = ? WHERE id = ? AND status = 'redeemed'",
    )
    .bind(now)
    .bind(now)
    .bind(redemption.id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::CodeAlreadyUsed(format!(
            "Code {code} was already used"
        )));
    }

    tx.commit().await?;

    let redemption = get_redemption(pool, redemption.id).await?;
    let voucher = match redemption.voucher_id {
        Some(voucher_id) => snapshot_for(pool, voucher_id).await?,
        None => None,
    };
    Ok(OwnedVoucher { redemption, voucher })
}

async fn snapshot_for(pool: &SqlitePool, voucher_id: i64) -> RepoResult<Option<VoucherSnapshot>> {
    let row = sqlx::query_as::<_, SnapshotRow>(
        "SELECT id, title, benefit, value, min_value, max_discount, valid_to, status FROM voucher WHERE id = ?",
    )
    .bind(voucher_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(SnapshotRow::into_snapshot))
}

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: i64,
    title: String,
    benefit: VoucherBenefit,
    value: i64,
    min_value: Option<i64>,
    max_discount: Option<i64>,
    valid_to: i64,
    status: VoucherStatus,
}

impl SnapshotRow {
    fn into_snapshot(self) -> VoucherSnapshot {
        VoucherSnapshot {
            id: self.id,
            title: self.title,
            benefit: self.benefit,
            value: self.value,
            min_value: self.min_value,
            max_discount: self.max_discount,
            valid_to: self.valid_to,
            status: self.status,
        }
    }
}

/// Redemption row LEFT JOINed with its (possibly deleted) voucher
#[derive(sqlx::FromRow)]
struct OwnedRow {
    id: i64,
    member_id: i64,
    voucher_id: Option<i64>,
    voucher_code: String,
    points_spent: i64,
    status: RedemptionStatus,
    used_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
    v_title: Option<String>,
    v_benefit: Option<VoucherBenefit>,
    v_value: Option<i64>,
    v_min_value: Option<i64>,
    v_max_discount: Option<i64>,
    v_valid_to: Option<i64>,
    v_status: Option<VoucherStatus>,
}

impl OwnedRow {
    fn into_owned(self) -> OwnedVoucher {
        let voucher = match (
            self.voucher_id,
            self.v_title,
            self.v_benefit,
            self.v_value,
            self.v_valid_to,
            self.v_status,
        ) {
            (Some(id), Some(title), Some(benefit), Some(value), Some(valid_to), Some(status)) => {
                Some(VoucherSnapshot {
                    id,
                    title,
                    benefit,
                    value,
                    min_value: self.v_min_value,
                    max_discount: self.v_max_discount,
                    valid_to,
                    status,
                })
            }
            _ => None,
        };
        OwnedVoucher {
            redemption: Redemption {
                id: self.id,
                member_id: self.member_id,
                voucher_id: self.voucher_id,
                voucher_code: self.voucher_code,
                points_spent: self.points_spent,
                status: self.status,
                used_at: self.used_at,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            voucher,
        }
    }
}

/// Resolve a redemption by its code, with the voucher snapshot attached
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<OwnedVoucher> {
    let redemption =
        sqlx::query_as::<_, Redemption>("SELECT * FROM redemption WHERE voucher_code = ?")
            .bind(code)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("No redemption with code {code}")))?;

    let voucher = match redemption.voucher_id {
        Some(voucher_id) => snapshot_for(pool, voucher_id).await?,
        None => None,
    };
    Ok(OwnedVoucher { redemption, voucher })
}

/// A member's redemptions, newest first, each with its voucher resolved
pub async fn owned_vouchers(pool: &SqlitePool, member_id: i64) -> RepoResult<Vec<OwnedVoucher>> {
    let rows = sqlx::query_as::<_, OwnedRow>(
        r#"
        SELECT r.id, r.member_id, r.voucher_id, r.voucher_code, r.points_spent,
               r.status, r.used_at, r.created_at, r.updated_at,
               v.title AS v_title, v.benefit AS v_benefit, v.value AS v_value,
               v.min_value AS v_min_value, v.max_discount AS v_max_discount,
               v.valid_to AS v_valid_to, v.status AS v_status
        FROM redemption r
        LEFT JOIN voucher v ON v.id = r.voucher_id
        WHERE r.member_id = ?
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(OwnedRow::into_owned).collect())
}
