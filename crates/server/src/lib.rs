//! Terraplane Server Library
//!
//! This crate provides the execution orchestrator for Terraplane, handling:
//!
//! - **Command Orchestration**: Run Terraform commands for a tenant under a
//!   distributed per-(tenant, template) lock
//! - **Distributed Locking**: Conditional-write lock records with TTL-based
//!   fencing so a crashed holder's lock self-heals
//! - **Workspace Hydration**: Tenant-isolated working directories with a
//!   rendered remote-state backend and the template's configuration
//! - **Execution Ledger**: Append-only audit trail of every command attempt
//!
//! ## Architecture
//!
//! The orchestrator composes the lock manager, workspace manager, artifact
//! fetcher, command runner, and ledger into one pipeline. Every failure
//! after lock acquisition releases the lock before the error surfaces; an
//! unreleased lock expires on its own via the TTL.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Database connectivity, models, and queries
//! - [`error`]: Custom error types with Axum integration
//! - [`handlers`]: HTTP route handlers
//! - [`services`]: Lock manager, artifact fetcher, ledger, orchestrator
//! - [`stores`]: Collaborator seams (lock store, template store, object
//!   storage, ledger) and their Postgres/HTTP implementations
//! - [`state`]: Shared application state

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod result_ext;
pub mod services;
pub mod state;
pub mod stores;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
