//! Distributed lock queries.
//!
//! The lock table is the single source of truth for cross-process mutual
//! exclusion. Acquisition is one conditional write: the row is inserted,
//! or overwritten only when the existing row has already expired.

use crate::db::models::LockRecord;
use crate::db::DbPool;
use crate::error::AppResult;

/// Conditionally write the lock record.
///
/// Succeeds when no row exists for the key, or when the existing row's
/// `expires_at` is before `now` (the fencing rule). Returns whether the
/// write landed.
pub async fn try_acquire_lock(pool: &DbPool, record: &LockRecord, now: i64) -> AppResult<bool> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        INSERT INTO terraform_locks (lock_key, acquired_at, expires_at, owner_user_id)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (lock_key) DO UPDATE
        SET acquired_at = EXCLUDED.acquired_at,
            expires_at = EXCLUDED.expires_at,
            owner_user_id = EXCLUDED.owner_user_id
        WHERE terraform_locks.expires_at < $5
        RETURNING lock_key
        "#,
    )
    .bind(&record.lock_key)
    .bind(record.acquired_at)
    .bind(record.expires_at)
    .bind(&record.owner_user_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Delete the lock record by key. Deleting an absent key is not an error.
pub async fn delete_lock(pool: &DbPool, lock_key: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM terraform_locks WHERE lock_key = $1")
        .bind(lock_key)
        .execute(pool)
        .await?;

    Ok(())
}

/// Fetch the current lock record for a key, if any.
pub async fn get_lock(pool: &DbPool, lock_key: &str) -> AppResult<Option<LockRecord>> {
    let record = sqlx::query_as::<_, LockRecord>(
        r#"
        SELECT lock_key, acquired_at, expires_at, owner_user_id
        FROM terraform_locks
        WHERE lock_key = $1
        "#,
    )
    .bind(lock_key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
