//! Execution ledger writer.

use std::sync::Arc;

use crate::db::models::ExecutionRecord;
use crate::result_ext::ResultExt;
use crate::stores::ExecutionLedger;

/// Appends audit records for every command attempt that reached the run
/// stage.
pub struct LedgerWriter {
    store: Arc<dyn ExecutionLedger>,
}

impl LedgerWriter {
    pub fn new(store: Arc<dyn ExecutionLedger>) -> Self {
        Self { store }
    }

    /// Append is best-effort: a ledger failure must not roll back an
    /// otherwise-successful run, so errors are logged and swallowed.
    pub async fn append(&self, record: &ExecutionRecord) {
        let _ = self
            .store
            .append(record)
            .await
            .log(format!("appending execution record {}", record.execution_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::memory::MemoryExecutionLedger;
    use chrono::Utc;
    use uuid::Uuid;

    fn record() -> ExecutionRecord {
        ExecutionRecord {
            execution_id: Uuid::new_v4(),
            tenant_id: "t1".to_string(),
            template_id: Uuid::new_v4(),
            executed_by: "u1".to_string(),
            command: "plan".to_string(),
            output: "No changes.".to_string(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_append_stores_record() {
        let store = Arc::new(MemoryExecutionLedger::new());
        let writer = LedgerWriter::new(store.clone());

        writer.append(&record()).await;
        assert_eq!(store.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_append_failure_is_swallowed() {
        let store = Arc::new(MemoryExecutionLedger::new());
        store.fail_appends();
        let writer = LedgerWriter::new(store.clone());

        // Must not panic or propagate.
        writer.append(&record()).await;
        assert!(store.records().await.is_empty());
    }
}
