//! Collaborator seams for the orchestrator.
//!
//! The lock store, template metadata store, execution ledger, and object
//! storage client are consumed through traits so the orchestrator only
//! depends on their interface boundary. Production wiring uses the
//! Postgres and HTTP implementations below.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{ExecutionRecord, LockRecord, TemplateMetadata};
use crate::error::AppResult;

mod object;
mod postgres;

#[cfg(test)]
pub mod memory;

pub use object::HttpObjectStore;
pub use postgres::{PgExecutionLedger, PgLockStore, PgTemplateStore};

/// Conditional put / delete over the shared lock table.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Write the record only if no live record exists for its key: absent,
    /// or expired as of `now` (epoch seconds). Returns whether the write
    /// landed.
    async fn try_put(&self, record: &LockRecord, now: i64) -> AppResult<bool>;

    /// Delete the record by key. Deleting an absent key is not an error.
    async fn delete(&self, lock_key: &str) -> AppResult<()>;

    /// Fetch the current record for a key, if any.
    async fn get(&self, lock_key: &str) -> AppResult<Option<LockRecord>>;
}

/// Read access to tenant-scoped template metadata.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Fetch a template's metadata; `None` when unknown for that tenant.
    async fn fetch(&self, tenant_id: &str, template_id: Uuid)
        -> AppResult<Option<TemplateMetadata>>;

    /// List a tenant's templates.
    async fn list(&self, tenant_id: &str) -> AppResult<Vec<TemplateMetadata>>;
}

/// Append-only execution audit trail.
#[async_trait]
pub trait ExecutionLedger: Send + Sync {
    async fn append(&self, record: &ExecutionRecord) -> AppResult<()>;
}

/// Object storage client for template artifacts.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's content; `None` when the object does not exist.
    async fn get(&self, bucket: &str, key: &str) -> AppResult<Option<String>>;
}
