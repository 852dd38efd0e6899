//! `brw config`: show where settings come from and what they are.

use anyhow::Result;
use brw_core::config::{self, BrwConfig};

pub fn run_config(cfg: &BrwConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    println!("{}", summary(cfg));
    Ok(())
}

fn summary(cfg: &BrwConfig) -> String {
    let timeout = |t: Option<u64>| t.map_or_else(|| "none".to_string(), |s| format!("{s}s"));
    format!(
        "max_redirects: {}\nuser_agent: {}\nconnect_timeout: {}\nread_timeout: {}\ncache_backend: {:?}",
        cfg.max_redirects,
        cfg.user_agent,
        timeout(cfg.connect_timeout_secs),
        timeout(cfg.read_timeout_secs),
        cfg.cache_backend(),
    )
}
