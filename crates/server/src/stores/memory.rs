//! In-memory store fakes for tests.
//!
//! These mirror the conditional-write and lookup semantics of the real
//! stores so the lock manager and orchestrator can be exercised without a
//! database or object storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::models::{ExecutionRecord, LockRecord, TemplateMetadata};
use crate::error::{AppError, AppResult};
use crate::stores::{ExecutionLedger, LockStore, ObjectStore, TemplateStore};

/// Lock store with the same fencing semantics as the Postgres table.
#[derive(Default)]
pub struct MemoryLockStore {
    records: Mutex<HashMap<String, LockRecord>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the conditional write.
    pub async fn insert(&self, record: LockRecord) {
        self.records
            .lock()
            .await
            .insert(record.lock_key.clone(), record);
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn try_put(&self, record: &LockRecord, now: i64) -> AppResult<bool> {
        let mut records = self.records.lock().await;
        match records.get(&record.lock_key) {
            Some(existing) if existing.is_live(now) => Ok(false),
            _ => {
                records.insert(record.lock_key.clone(), record.clone());
                Ok(true)
            }
        }
    }

    async fn delete(&self, lock_key: &str) -> AppResult<()> {
        self.records.lock().await.remove(lock_key);
        Ok(())
    }

    async fn get(&self, lock_key: &str) -> AppResult<Option<LockRecord>> {
        Ok(self.records.lock().await.get(lock_key).cloned())
    }
}

/// Template store seeded with a fixed set of templates.
#[derive(Default)]
pub struct MemoryTemplateStore {
    templates: Vec<TemplateMetadata>,
}

impl MemoryTemplateStore {
    pub fn new(templates: Vec<TemplateMetadata>) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn fetch(
        &self,
        tenant_id: &str,
        template_id: Uuid,
    ) -> AppResult<Option<TemplateMetadata>> {
        Ok(self
            .templates
            .iter()
            .find(|t| t.tenant_id == tenant_id && t.template_id == template_id)
            .cloned())
    }

    async fn list(&self, tenant_id: &str) -> AppResult<Vec<TemplateMetadata>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}

/// Ledger that keeps appended records in memory; can be told to fail.
#[derive(Default)]
pub struct MemoryExecutionLedger {
    records: Mutex<Vec<ExecutionRecord>>,
    fail: AtomicBool,
}

impl MemoryExecutionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_appends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<ExecutionRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ExecutionLedger for MemoryExecutionLedger {
    async fn append(&self, record: &ExecutionRecord) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Ledger("ledger unavailable".to_string()));
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Object store over a fixed map; can be told to fail every fetch.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: HashMap<(String, String), String>,
    fail: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, bucket: &str, key: &str, content: &str) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), content.to_string());
        self
    }

    pub fn fail_fetches(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> AppResult<Option<String>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::ObjectStore("object storage down".to_string()));
        }
        Ok(self
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_conditional_put_respects_live_records() {
        let store = MemoryLockStore::new();
        let record = LockRecord {
            lock_key: "t1-x".to_string(),
            acquired_at: 100,
            expires_at: 200,
            owner_user_id: "u1".to_string(),
        };

        assert!(store.try_put(&record, 100).await.unwrap());
        // Live record blocks a second writer.
        assert!(!store.try_put(&record, 150).await.unwrap());
        // Expired record is overwritable.
        assert!(store.try_put(&record, 201).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryLockStore::new();
        store.delete("missing").await.unwrap();
        store.delete("missing").await.unwrap();
    }
}
