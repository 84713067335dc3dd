//! Distributed lock manager.
//!
//! One lock per `{tenant}-{template}` key over a shared conditional-write
//! store. TTL-based fencing means a crashed holder never blocks new
//! acquirers for longer than the TTL, without needing a coordinator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use terraplane_core::retry::{retry_with_backoff, RetryPolicy};

use crate::db::models::LockRecord;
use crate::error::{AppError, AppResult};
use crate::stores::LockStore;

/// Fixed number of delete attempts before a release is abandoned to TTL
/// self-healing.
const RELEASE_ATTEMPTS: u32 = 3;

/// Handle to a held lock; consumed by [`LockManager::release`].
#[derive(Debug)]
pub struct LockGuard {
    lock_key: String,
}

impl LockGuard {
    pub fn lock_key(&self) -> &str {
        &self.lock_key
    }

    #[cfg(test)]
    pub(crate) fn for_key(lock_key: &str) -> Self {
        Self {
            lock_key: lock_key.to_string(),
        }
    }
}

/// Acquires and releases per-(tenant, template) locks.
pub struct LockManager {
    store: Arc<dyn LockStore>,
    ttl_seconds: i64,
    retry: RetryPolicy,
}

impl LockManager {
    pub fn new(store: Arc<dyn LockStore>, ttl_seconds: u64) -> Self {
        Self {
            store,
            ttl_seconds: ttl_seconds as i64,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the backoff policy (shortened in tests).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Composite lock key for a tenant/template pair.
    pub fn lock_key(tenant_id: &str, template_id: Uuid) -> String {
        format!("{}-{}", tenant_id, template_id)
    }

    /// Acquire the lock for the pair, retrying contention with backoff and
    /// jitter before surfacing [`AppError::LockHeld`].
    ///
    /// The conditional write succeeds when no record exists for the key or
    /// the existing record has expired, regardless of its owner.
    pub async fn acquire(
        &self,
        tenant_id: &str,
        template_id: Uuid,
        user_id: &str,
    ) -> AppResult<LockGuard> {
        let lock_key = Self::lock_key(tenant_id, template_id);

        retry_with_backoff(
            &self.retry,
            |e: &AppError| matches!(e, AppError::LockHeld(_) | AppError::Database(_)),
            || {
                let lock_key = lock_key.clone();
                let owner = user_id.to_string();
                async move {
                    let now = Utc::now().timestamp();
                    let record = LockRecord {
                        lock_key: lock_key.clone(),
                        acquired_at: now,
                        expires_at: now + self.ttl_seconds,
                        owner_user_id: owner,
                    };

                    if self.store.try_put(&record, now).await? {
                        Ok(())
                    } else {
                        Err(AppError::LockHeld(format!(
                            "Lock already acquired for template {}",
                            template_id
                        )))
                    }
                }
            },
        )
        .await?;

        tracing::warn!(lock_key = %lock_key, "Acquired lock");
        Ok(LockGuard { lock_key })
    }

    /// Release the lock. Best-effort: failures are logged, never escalated,
    /// because a stale-but-expired record self-heals on the next acquire.
    /// Releasing an already-released key is a no-op.
    pub async fn release(&self, guard: LockGuard) {
        let LockGuard { lock_key } = guard;
        tracing::warn!(lock_key = %lock_key, "Releasing lock");

        for attempt in 1..=RELEASE_ATTEMPTS {
            match self.store.delete(&lock_key).await {
                Ok(()) => return,
                Err(e) if attempt < RELEASE_ATTEMPTS => {
                    tracing::warn!(
                        lock_key = %lock_key,
                        attempt,
                        error = %e,
                        "Lock release failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
                Err(e) => {
                    tracing::error!(
                        lock_key = %lock_key,
                        error = %e,
                        "Failed to release lock; it will expire via TTL"
                    );
                }
            }
        }
    }
}
