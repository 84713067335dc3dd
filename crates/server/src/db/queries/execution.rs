//! Execution ledger queries.

use crate::db::models::ExecutionRecord;
use crate::db::DbPool;
use crate::error::AppResult;

/// Append an execution record. The ledger is append-only; records are
/// never updated or deleted.
pub async fn insert_execution(pool: &DbPool, record: &ExecutionRecord) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO executions (
            execution_id, tenant_id, template_id, executed_by,
            command, output, started_at, completed_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(record.execution_id)
    .bind(&record.tenant_id)
    .bind(record.template_id)
    .bind(&record.executed_by)
    .bind(&record.command)
    .bind(&record.output)
    .bind(record.started_at)
    .bind(record.completed_at)
    .execute(pool)
    .await?;

    Ok(())
}
