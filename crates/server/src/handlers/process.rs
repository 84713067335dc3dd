//! Command execution API handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Request to execute a Terraform command for a tenant's template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Tenant the command runs for.
    pub tenant_id: String,

    /// Template to run against.
    pub template_id: Uuid,

    /// Requesting user.
    pub user_id: String,

    /// Terraform subcommand (init, plan, apply, destroy).
    pub command: String,

    /// Extra arguments passed through to the binary.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Response carrying the captured command output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Combined output of the run.
    pub output: String,
}

/// Execute a Terraform command.
///
/// `POST /api/process/execute`
///
/// Runs the command under the tenant/template lock. A held lock maps to
/// `409 Conflict`, validation failures to a client error, everything else
/// to a server error.
pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, AppError> {
    debug!(
        tenant_id = %request.tenant_id,
        template_id = %request.template_id,
        command = %request.command,
        "Execute request"
    );

    let output = state
        .terraform
        .execute_command(
            &request.tenant_id,
            request.template_id,
            &request.user_id,
            &request.command,
            &request.args,
        )
        .await?;

    Ok(Json(ExecuteResponse { output }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization_defaults_args() {
        let json = serde_json::json!({
            "tenant_id": "t1",
            "template_id": "02ebe298-1037-4fbf-88dd-a3115930aeed",
            "user_id": "u1",
            "command": "plan"
        });

        let request: ExecuteRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.tenant_id, "t1");
        assert!(request.args.is_empty());
    }
}
