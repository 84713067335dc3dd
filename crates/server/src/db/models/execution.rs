//! Execution ledger model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One append-only audit record per command attempt that reached the run
/// stage. Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExecutionRecord {
    /// Unique execution identifier.
    pub execution_id: Uuid,

    /// Tenant the command ran for.
    pub tenant_id: String,

    /// Template the command ran against.
    pub template_id: Uuid,

    /// User that requested the run.
    pub executed_by: String,

    /// Terraform subcommand that was executed.
    pub command: String,

    /// Captured combined output.
    pub output: String,

    /// Timestamp captured before the subprocess started.
    pub started_at: DateTime<Utc>,

    /// Timestamp captured after the subprocess finished.
    pub completed_at: DateTime<Utc>,
}
