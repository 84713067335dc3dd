//! Orchestration services.

pub mod artifact;
pub mod backend;
pub mod command;
pub mod ledger;
pub mod lock;
pub mod terraform;

pub use artifact::ArtifactFetcher;
pub use command::TerraformCommand;
pub use ledger::LedgerWriter;
pub use lock::{LockGuard, LockManager};
pub use terraform::TerraformService;
