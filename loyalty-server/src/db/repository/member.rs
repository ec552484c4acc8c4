//! Member Repository
//!
//! Balance mutations (earn/adjust) run in transactions; the UPDATE carries
//! its precondition so a failed guard rolls back the whole operation.

use shared::models::{
    EarnResult, Member, MemberCreate, MemberInfo, MemberSnapshot, PointEntryType,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, point_history, redemption, voucher};
use crate::loyalty::{next_tier, points_for_amount, resolve_tier};

pub async fn get_member(pool: &SqlitePool, id: i64) -> RepoResult<Member> {
    sqlx::query_as::<_, Member>("SELECT * FROM member WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id} not found")))
}

pub async fn get_member_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Member> {
    sqlx::query_as::<_, Member>("SELECT * FROM member WHERE phone = ?")
        .bind(phone)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("No member with phone {phone}")))
}

pub async fn list_members(pool: &SqlitePool) -> RepoResult<Vec<Member>> {
    let members = sqlx::query_as::<_, Member>("SELECT * FROM member ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(members)
}

/// Create a member in the base tier (lowest threshold)
pub async fn create_member(pool: &SqlitePool, payload: MemberCreate) -> RepoResult<Member> {
    if payload.name.trim().is_empty() {
        return Err(RepoError::Validation("Member name is required".to_string()));
    }
    if payload.phone.trim().is_empty() {
        return Err(RepoError::Validation("Phone number is required".to_string()));
    }

    let base_tier_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM loyalty_tier ORDER BY min_points ASC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::Conflict("No loyalty tiers configured".to_string()))?;

    let id = snowflake_id();
    let now = now_millis();
    let result = sqlx::query(
        r#"
        INSERT INTO member (id, user_id, name, phone, total_points, redeemable_points, tier_id, source, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, 0, 0, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(id)
    .bind(payload.user_id)
    .bind(payload.name.trim())
    .bind(payload.phone.trim())
    .bind(base_tier_id)
    .bind(payload.source.unwrap_or_else(|| "store".to_string()))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => get_member(pool, id).await,
        Err(e) if super::is_unique_violation(&e) => Err(RepoError::Conflict(format!(
            "A member with phone {} already exists",
            payload.phone.trim()
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Credit points for a purchase.
///
/// The multiplier comes from the member's tier at the moment of earning;
/// the tier is then re-resolved from the new lifetime total.
pub async fn earn_points(
    pool: &SqlitePool,
    member_id: i64,
    order_amount: i64,
    description: Option<String>,
) -> RepoResult<EarnResult> {
    if order_amount <= 0 {
        return Err(RepoError::InvalidAmount(
            "Order amount must be positive".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let member = sqlx::query_as::<_, Member>("SELECT * FROM member WHERE id = ?")
        .bind(member_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {member_id} not found")))?;

    let tiers = sqlx::query_as::<_, shared::models::LoyaltyTier>(
        "SELECT * FROM loyalty_tier ORDER BY min_points ASC",
    )
    .fetch_all(&mut *tx)
    .await?;

    let multiplier = tiers
        .iter()
        .find(|t| t.id == member.tier_id)
        .map(|t| t.point_multiplier)
        .unwrap_or(1.0);
    let points = points_for_amount(order_amount, multiplier);

    let new_total = member.total_points + points;
    let new_tier_id = resolve_tier(new_total, &tiers)
        .map(|t| t.id)
        .unwrap_or(member.tier_id);

    let now = now_millis();
    sqlx::query(
        r#"
        UPDATE member SET
            total_points = total_points + ?,
            redeemable_points = redeemable_points + ?,
            tier_id = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(points)
    .bind(points)
    .bind(new_tier_id)
    .bind(now)
    .bind(member_id)
    .execute(&mut *tx)
    .await?;

    if points > 0 {
        point_history::insert_entry(
            &mut tx,
            member_id,
            PointEntryType::Earn,
            points,
            "order",
            None,
            &description
                .unwrap_or_else(|| format!("Purchase of {order_amount} VND")),
        )
        .await?;
    }

    tx.commit().await?;

    Ok(EarnResult {
        member_id,
        points_earned: points,
        redeemable_points: member.redeemable_points + points,
    })
}

/// Admin correction, positive or negative.
///
/// Negative deltas are guarded against the redeemable balance; the
/// lifetime total moves too so the tier follows the correction.
pub async fn adjust_points(
    pool: &SqlitePool,
    member_id: i64,
    delta: i64,
    description: Option<String>,
) -> RepoResult<Member> {
    if delta == 0 {
        return Err(RepoError::InvalidAmount(
            "Adjustment must be non-zero".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let member = sqlx::query_as::<_, Member>("SELECT * FROM member WHERE id = ?")
        .bind(member_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {member_id} not found")))?;

    let tiers = sqlx::query_as::<_, shared::models::LoyaltyTier>(
        "SELECT * FROM loyalty_tier ORDER BY min_points ASC",
    )
    .fetch_all(&mut *tx)
    .await?;

    let new_total = (member.total_points + delta).max(0);
    let new_tier_id = resolve_tier(new_total, &tiers)
        .map(|t| t.id)
        .unwrap_or(member.tier_id);

    let result = sqlx::query(
        r#"
        UPDATE member SET
            total_points = ?,
            redeemable_points = redeemable_points + ?,
            tier_id = ?,
            updated_at = ?
        WHERE id = ? AND redeemable_points + ? >= 0
        "#,
    )
    .bind(new_total)
    .bind(delta)
    .bind(new_tier_id)
    .bind(now_millis())
    .bind(member_id)
    .bind(delta)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::InsufficientBalance(format!(
            "Cannot deduct {} points from a balance of {}",
            -delta, member.redeemable_points
        )));
    }

    let entry_type = if delta > 0 {
        PointEntryType::Earn
    } else {
        PointEntryType::Spend
    };
    point_history::insert_entry(
        &mut tx,
        member_id,
        entry_type,
        delta,
        "admin_adjustment",
        None,
        &description.unwrap_or_else(|| "Manual adjustment".to_string()),
    )
    .await?;

    tx.commit().await?;

    get_member(pool, member_id).await
}

/// Member header with the resolved tier name
pub async fn member_info(pool: &SqlitePool, member: &Member) -> RepoResult<MemberInfo> {
    let tier_name =
        sqlx::query_scalar::<_, String>("SELECT name FROM loyalty_tier WHERE id = ?")
            .bind(member.tier_id)
            .fetch_optional(pool)
            .await?
            .unwrap_or_default();

    Ok(MemberInfo {
        id: member.id,
        name: member.name.clone(),
        phone: member.phone.clone(),
        redeemable_points: member.redeemable_points,
        total_points: member.total_points,
        tier: tier_name,
    })
}

/// Full dashboard snapshot for a member, looked up by phone
pub async fn member_snapshot(pool: &SqlitePool, phone: &str) -> RepoResult<MemberSnapshot> {
    let member = get_member_by_phone(pool, phone).await?;
    let info = member_info(pool, &member).await?;

    let tiers = sqlx::query_as::<_, shared::models::LoyaltyTier>(
        "SELECT * FROM loyalty_tier ORDER BY min_points ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(MemberSnapshot {
        next_tier_info: next_tier(member.total_points, &tiers),
        available_vouchers: voucher::list_available(pool, member.redeemable_points).await?,
        owned_vouchers: redemption::owned_vouchers(pool, member.id).await?,
        point_history: point_history::list_for_member(pool, member.id, 50).await?,
        member_info: info,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::repository::tier::tests::seed_tiers;
    use crate::db::test_pool;

    pub(crate) async fn seed_member(pool: &SqlitePool, phone: &str) -> Member {
        create_member(
            pool,
            MemberCreate {
                name: "Linh".to_string(),
                phone: phone.to_string(),
                user_id: None,
                source: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_member_starts_in_base_tier() {
        let pool = test_pool().await;
        let tiers = seed_tiers(&pool).await;

        let member = seed_member(&pool, "0901111111").await;
        assert_eq!(member.tier_id, tiers[0].id);
        assert_eq!(member.total_points, 0);
        assert_eq!(member.redeemable_points, 0);
        assert_eq!(member.source, "store");
        assert!(member.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        seed_member(&pool, "0901111111").await;

        let err = create_member(
            &pool,
            MemberCreate {
                name: "Other".to_string(),
                phone: "0901111111".to_string(),
                user_id: None,
                source: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_earn_base_rate() {
        // 500,000 VND at Bronze (×1.0) credits 500 points
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;

        let result = earn_points(&pool, member.id, 500_000, None).await.unwrap();
        assert_eq!(result.points_earned, 500);
        assert_eq!(result.redeemable_points, 500);

        let member = get_member(&pool, member.id).await.unwrap();
        assert_eq!(member.total_points, 500);
        assert_eq!(member.redeemable_points, 500);

        let history = point_history::list_for_member(&pool, member.id, 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 500);
        assert_eq!(history[0].source, "order");
    }

    #[tokio::test]
    async fn test_earn_promotes_tier_and_next_earn_uses_new_multiplier() {
        let pool = test_pool().await;
        let tiers = seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;

        // 1,000,000 VND at ×1.0 → 1000 points, crossing the Silver threshold
        earn_points(&pool, member.id, 1_000_000, None).await.unwrap();
        let member_now = get_member(&pool, member.id).await.unwrap();
        assert_eq!(member_now.tier_id, tiers[1].id);

        // Next earn applies the Silver ×1.2 multiplier
        let result = earn_points(&pool, member.id, 500_000, None).await.unwrap();
        assert_eq!(result.points_earned, 600);
    }

    #[tokio::test]
    async fn test_earn_rejects_non_positive_amount() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;

        let err = earn_points(&pool, member.id, 0, None).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidAmount(_)));
        let err = earn_points(&pool, member.id, -100, None).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_earn_unknown_member() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let err = earn_points(&pool, 42, 100_000, None).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_adjust_negative_within_balance() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;
        earn_points(&pool, member.id, 500_000, None).await.unwrap();

        let member = adjust_points(&pool, member.id, -200, None).await.unwrap();
        assert_eq!(member.redeemable_points, 300);
        assert_eq!(member.total_points, 300);

        let history = point_history::list_for_member(&pool, member.id, 10)
            .await
            .unwrap();
        let adjustment = history
            .iter()
            .find(|e| e.source == "admin_adjustment")
            .unwrap();
        assert_eq!(adjustment.amount, -200);
        assert_eq!(adjustment.entry_type, PointEntryType::Spend);
    }

    #[tokio::test]
    async fn test_adjust_cannot_overdraw() {
        // Deducting past zero must fail whole, leaving the ledger untouched
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;
        earn_points(&pool, member.id, 100_000, None).await.unwrap();

        let err = adjust_points(&pool, member.id, -500, None).await.unwrap_err();
        assert!(matches!(err, RepoError::InsufficientBalance(_)));

        // Nothing committed
        let member = get_member(&pool, member.id).await.unwrap();
        assert_eq!(member.redeemable_points, 100);
        let history = point_history::list_for_member(&pool, member.id, 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_adjust_positive_promotes_tier() {
        let pool = test_pool().await;
        let tiers = seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;

        let member = adjust_points(&pool, member.id, 6000, None).await.unwrap();
        assert_eq!(member.tier_id, tiers[2].id);
    }

    #[tokio::test]
    async fn test_snapshot_by_phone() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;
        earn_points(&pool, member.id, 500_000, None).await.unwrap();

        let snapshot = member_snapshot(&pool, "0901111111").await.unwrap();
        assert_eq!(snapshot.member_info.redeemable_points, 500);
        assert_eq!(snapshot.member_info.tier, "Bronze");
        let next = snapshot.next_tier_info.unwrap();
        assert_eq!(next.name, "Silver");
        assert_eq!(next.points_needed, 500);
        assert_eq!(snapshot.point_history.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_unknown_phone() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let err = member_snapshot(&pool, "0000000000").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
