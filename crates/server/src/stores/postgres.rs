//! Postgres-backed store implementations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{ExecutionRecord, LockRecord, TemplateMetadata};
use crate::db::{queries, DbPool};
use crate::error::AppResult;
use crate::stores::{ExecutionLedger, LockStore, TemplateStore};

/// Lock store backed by the `terraform_locks` table.
#[derive(Clone)]
pub struct PgLockStore {
    pool: DbPool,
}

impl PgLockStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LockStore for PgLockStore {
    async fn try_put(&self, record: &LockRecord, now: i64) -> AppResult<bool> {
        queries::lock::try_acquire_lock(&self.pool, record, now).await
    }

    async fn delete(&self, lock_key: &str) -> AppResult<()> {
        queries::lock::delete_lock(&self.pool, lock_key).await
    }

    async fn get(&self, lock_key: &str) -> AppResult<Option<LockRecord>> {
        queries::lock::get_lock(&self.pool, lock_key).await
    }
}

/// Template metadata store backed by the `template_metadata` table.
#[derive(Clone)]
pub struct PgTemplateStore {
    pool: DbPool,
}

impl PgTemplateStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn fetch(
        &self,
        tenant_id: &str,
        template_id: Uuid,
    ) -> AppResult<Option<TemplateMetadata>> {
        queries::template::fetch_template_metadata(&self.pool, tenant_id, template_id).await
    }

    async fn list(&self, tenant_id: &str) -> AppResult<Vec<TemplateMetadata>> {
        queries::template::list_templates(&self.pool, tenant_id).await
    }
}

/// Execution ledger backed by the `executions` table.
#[derive(Clone)]
pub struct PgExecutionLedger {
    pool: DbPool,
}

impl PgExecutionLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExecutionLedger for PgExecutionLedger {
    async fn append(&self, record: &ExecutionRecord) -> AppResult<()> {
        queries::execution::insert_execution(&self.pool, record).await
    }
}
