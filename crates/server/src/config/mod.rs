//! Configuration loading for the Terraplane server.

mod app;
mod database;
mod terraform;

pub use app::AppConfig;
pub use database::DatabaseConfig;
pub use terraform::TerraformConfig;
