//! Distributed lock record model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One lock row per `{tenant}-{template}` key.
///
/// A record whose `expires_at` is in the past counts as absent even if not
/// yet physically deleted; that fencing rule lets a new caller recover from
/// a crashed holder without a coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LockRecord {
    /// Composite `{tenant_id}-{template_id}` key.
    pub lock_key: String,

    /// Epoch seconds at acquisition.
    pub acquired_at: i64,

    /// Epoch seconds past which the record no longer counts as held.
    pub expires_at: i64,

    /// User that acquired the lock.
    pub owner_user_id: String,
}

impl LockRecord {
    /// Whether the record still counts as held at `now` (epoch seconds).
    pub fn is_live(&self, now: i64) -> bool {
        self.expires_at >= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let record = LockRecord {
            lock_key: "t1-abc".to_string(),
            acquired_at: 1000,
            expires_at: 1800,
            owner_user_id: "u1".to_string(),
        };

        assert!(record.is_live(1500));
        assert!(record.is_live(1800));
        assert!(!record.is_live(1801));
    }
}
