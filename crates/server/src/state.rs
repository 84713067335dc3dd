//! Application state for the Terraplane server.
//!
//! This module defines the shared application state that is
//! passed to all handlers via Axum's state management.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::TerraformService;
use crate::stores::TemplateStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Execution orchestrator
    pub terraform: Arc<TerraformService>,

    /// Template metadata store
    pub templates: Arc<dyn TemplateStore>,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(
        db: DbPool,
        config: AppConfig,
        terraform: Arc<TerraformService>,
        templates: Arc<dyn TemplateStore>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            terraform,
            templates,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
