//! Point History Repository
//!
//! Append-only; entries are written inside the same transaction as the
//! balance change they record.

use shared::models::{PointEntryType, PointHistory};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::RepoResult;

/// Append a ledger entry within the caller's transaction
pub(crate) async fn insert_entry(
    tx: &mut Transaction<'_, Sqlite>,
    member_id: i64,
    entry_type: PointEntryType,
    amount: i64,
    source: &str,
    ref_id: Option<i64>,
    description: &str,
) -> RepoResult<i64> {
    let id = snowflake_id();
    sqlx::query(
        r#"
        INSERT INTO point_history (id, member_id, entry_type, amount, source, ref_id, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(member_id)
    .bind(entry_type)
    .bind(amount)
    .bind(source)
    .bind(ref_id)
    .bind(description)
    .bind(now_millis())
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

/// Newest-first ledger entries for a member
pub async fn list_for_member(
    pool: &SqlitePool,
    member_id: i64,
    limit: i64,
) -> RepoResult<Vec<PointHistory>> {
    let entries = sqlx::query_as::<_, PointHistory>(
        "SELECT * FROM point_history WHERE member_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(member_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::member::tests::seed_member;
    use crate::db::repository::tier::tests::seed_tiers;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_entries_come_back_newest_first() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;

        let mut tx = pool.begin().await.unwrap();
        insert_entry(&mut tx, member.id, PointEntryType::Earn, 100, "order", None, "first")
            .await
            .unwrap();
        // Separate the created_at millisecond so ordering is deterministic
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        insert_entry(&mut tx, member.id, PointEntryType::Spend, -40, "redeem_voucher", Some(7), "second")
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let entries = list_for_member(&pool, member.id, 10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "second");
        assert_eq!(entries[0].amount, -40);
        assert_eq!(entries[0].ref_id, Some(7));
        assert_eq!(entries[1].entry_type, PointEntryType::Earn);
    }

    #[tokio::test]
    async fn test_limit_applies() {
        let pool = test_pool().await;
        seed_tiers(&pool).await;
        let member = seed_member(&pool, "0901111111").await;

        let mut tx = pool.begin().await.unwrap();
        for i in 0..5 {
            insert_entry(
                &mut tx,
                member.id,
                PointEntryType::Earn,
                i,
                "order",
                None,
                "entry",
            )
            .await
            .unwrap();
        }
        tx.commit().await.unwrap();

        let entries = list_for_member(&pool, member.id, 3).await.unwrap();
        assert_eq!(entries.len(), 3);
    }
}
