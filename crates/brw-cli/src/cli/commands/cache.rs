//! `brw cache purge`: drop every cached response.

use anyhow::Result;
use brw_core::cache::CacheStore;
use brw_core::config::BrwConfig;
use brw_core::Fetcher;

pub fn run_cache_purge(cfg: &BrwConfig) -> Result<()> {
    let fetcher = Fetcher::from_config(cfg)?;
    let removed = fetcher.cache().purge()?;
    tracing::info!("purged {removed} cache entries");
    println!("Removed {removed} cached responses.");
    Ok(())
}
