//! CLI command handlers. Each command is in its own file.

mod cache;
mod config;
mod load;

pub use cache::run_cache_purge;
pub use config::run_config;
pub use load::run_load;
