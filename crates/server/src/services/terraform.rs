//! Multi-tenant Terraform execution orchestrator.
//!
//! Composes the lock manager, workspace manager, artifact fetcher, command
//! runner, and execution ledger into one pipeline:
//!
//! validate -> acquire lock -> prepare workspace -> run -> finalize -> release
//!
//! Any failure after lock acquisition releases the lock before the error
//! surfaces, so a failed run never leaves its key locked for a full TTL.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use terraplane_core::{validate_tenant_id, CommandRunner, WorkspaceManager};

use crate::config::TerraformConfig;
use crate::db::models::ExecutionRecord;
use crate::error::{AppError, AppResult};
use crate::services::artifact::ArtifactFetcher;
use crate::services::backend::render_backend_config;
use crate::services::command::TerraformCommand;
use crate::services::ledger::LedgerWriter;
use crate::services::lock::LockManager;
use crate::stores::TemplateStore;

const BACKEND_FILE: &str = "backend.tf";
const MAIN_FILE: &str = "main.tf";
const STATE_FILE: &str = "terraform.tfstate";

/// End-to-end orchestrator for tenant Terraform runs.
pub struct TerraformService {
    locks: LockManager,
    workspace: Arc<WorkspaceManager>,
    templates: Arc<dyn TemplateStore>,
    artifacts: ArtifactFetcher,
    ledger: LedgerWriter,
    runner: CommandRunner,
    default_config: String,
    bucket: String,
    state_key_prefix: String,
    allowed_commands: Vec<String>,
    command_timeout: Duration,
    operation_timeout: Duration,
}

impl TerraformService {
    pub fn new(
        locks: LockManager,
        workspace: Arc<WorkspaceManager>,
        templates: Arc<dyn TemplateStore>,
        artifacts: ArtifactFetcher,
        ledger: LedgerWriter,
        runner: CommandRunner,
        config: &TerraformConfig,
    ) -> Self {
        Self {
            locks,
            workspace,
            templates,
            artifacts,
            ledger,
            runner,
            default_config: config.default_config.clone(),
            bucket: config.bucket.clone(),
            state_key_prefix: config.state_key_prefix.clone(),
            allowed_commands: config.allowed_commands.clone(),
            command_timeout: config.command_timeout(),
            operation_timeout: config.operation_timeout(),
        }
    }

    /// Execute a Terraform command for a tenant's template.
    ///
    /// Holds the `{tenant}-{template}` lock for the duration; concurrent
    /// calls on the same pair see [`AppError::LockHeld`]. The whole
    /// operation is bounded by the configured timeout, which triggers the
    /// same compensating lock release as any other failure.
    pub async fn execute_command(
        &self,
        tenant_id: &str,
        template_id: Uuid,
        user_id: &str,
        command: &str,
        args: &[String],
    ) -> AppResult<String> {
        validate_tenant_id(tenant_id)?;
        let command = self.validate_command(command)?;

        let guard = self.locks.acquire(tenant_id, template_id, user_id).await?;

        let outcome = tokio::time::timeout(
            self.operation_timeout,
            self.run_locked(tenant_id, template_id, user_id, command, args),
        )
        .await;

        // Single compensation point: runs for success, failure, and timeout
        // alike, before any error surfaces. A cancelled run's subprocess is
        // killed when its future is dropped.
        self.locks.release(guard).await;

        match outcome {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    tenant_id = %tenant_id,
                    template_id = %template_id,
                    "Operation timed out"
                );
                Err(AppError::Timeout(self.operation_timeout.as_secs()))
            }
        }
    }

    /// The lock-holding stages: prepare workspace, run, finalize.
    async fn run_locked(
        &self,
        tenant_id: &str,
        template_id: Uuid,
        user_id: &str,
        command: TerraformCommand,
        args: &[String],
    ) -> AppResult<String> {
        let tenant_dir = self.workspace.tenant_dir(tenant_id).await?;

        let backend =
            render_backend_config(&self.bucket, &self.state_key_prefix, tenant_id, template_id)?;
        self.workspace
            .write_file(tenant_id, BACKEND_FILE, &backend)
            .await?;

        let template = self
            .templates
            .fetch(tenant_id, template_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Template {} not found for tenant {}",
                    template_id, tenant_id
                ))
            })?;

        let content = self
            .artifacts
            .fetch(&template.storage_key)
            .await
            .unwrap_or_else(|| self.default_config.clone());
        self.workspace
            .write_file(tenant_id, MAIN_FILE, &content)
            .await?;

        tracing::info!(
            tenant_id = %tenant_id,
            template_id = %template_id,
            command = %command,
            "Running terraform command"
        );

        let started_at = Utc::now();
        let run = self
            .runner
            .run(command.as_str(), args, &tenant_dir, self.command_timeout)
            .await;
        let completed_at = Utc::now();

        // Every attempt that reached the run stage gets a ledger record,
        // failed ones included.
        let logged_output = match &run {
            Ok(output) => output.clone(),
            Err(terraplane_core::CoreError::NonZeroExit { output, .. }) => output.clone(),
            Err(e) => e.to_string(),
        };
        self.ledger
            .append(&ExecutionRecord {
                execution_id: Uuid::new_v4(),
                tenant_id: tenant_id.to_string(),
                template_id,
                executed_by: user_id.to_string(),
                command: command.to_string(),
                output: logged_output,
                started_at,
                completed_at,
            })
            .await;

        let output = run.map_err(AppError::from)?;

        if command.persists_state() {
            self.persist_state(tenant_id, &tenant_dir).await?;
        }

        Ok(output)
    }

    /// Persist the run's local state file through the workspace manager so
    /// the last known state is written under the tenant's lock. Absent
    /// state (nothing to apply, plan-only runs) is not an error.
    async fn persist_state(&self, tenant_id: &str, tenant_dir: &Path) -> AppResult<()> {
        let state_path = tenant_dir.join(STATE_FILE);
        match tokio::fs::read_to_string(&state_path).await {
            Ok(state) => self
                .workspace
                .write_file(tenant_id, STATE_FILE, &state)
                .await
                .map_err(AppError::from),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Workspace(e.to_string())),
        }
    }

    fn validate_command(&self, command: &str) -> AppResult<TerraformCommand> {
        let parsed = TerraformCommand::parse(command)
            .ok_or_else(|| AppError::Validation(format!("Command not allowed: {}", command)))?;

        if !self.allowed_commands.iter().any(|c| c == parsed.as_str()) {
            return Err(AppError::Validation(format!(
                "Command not allowed: {}",
                command
            )));
        }

        Ok(parsed)
    }
}
