//! Schema bootstrap for the orchestrator's tables.

use crate::db::DbPool;
use crate::error::AppResult;

const CREATE_TEMPLATE_METADATA: &str = r#"
CREATE TABLE IF NOT EXISTS template_metadata (
    template_id UUID NOT NULL,
    tenant_id   TEXT NOT NULL,
    name        TEXT NOT NULL,
    storage_key TEXT NOT NULL,
    PRIMARY KEY (tenant_id, template_id)
)
"#;

const CREATE_EXECUTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS executions (
    execution_id UUID PRIMARY KEY,
    tenant_id    TEXT NOT NULL,
    template_id  UUID NOT NULL,
    executed_by  TEXT NOT NULL,
    command      TEXT NOT NULL,
    output       TEXT NOT NULL,
    started_at   TIMESTAMPTZ NOT NULL,
    completed_at TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_TERRAFORM_LOCKS: &str = r#"
CREATE TABLE IF NOT EXISTS terraform_locks (
    lock_key      TEXT PRIMARY KEY,
    acquired_at   BIGINT NOT NULL,
    expires_at    BIGINT NOT NULL,
    owner_user_id TEXT NOT NULL
)
"#;

/// Create the orchestrator's tables if they do not exist.
pub async fn ensure_schema(pool: &DbPool) -> AppResult<()> {
    sqlx::query(CREATE_TEMPLATE_METADATA).execute(pool).await?;
    sqlx::query(CREATE_EXECUTIONS).execute(pool).await?;
    sqlx::query(CREATE_TERRAFORM_LOCKS).execute(pool).await?;

    tracing::info!("Database schema ensured");
    Ok(())
}
