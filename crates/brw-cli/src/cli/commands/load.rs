//! `brw load <url>`: fetch a URL and print it.

use anyhow::Result;
use brw_core::config::{BrwConfig, CacheBackend};
use brw_core::{FetchOutcome, Fetcher};

use crate::cli::render;

/// Exit code for loads that end without a body (redirect loop, HTTP error).
const EXIT_NO_BODY: i32 = 2;

pub fn run_load(cfg: &BrwConfig, url: &str, raw: bool, no_cache: bool) -> Result<i32> {
    let fetcher = if no_cache {
        let cfg = BrwConfig {
            cache_backend: Some(CacheBackend::Off),
            ..cfg.clone()
        };
        Fetcher::from_config(&cfg)?
    } else {
        Fetcher::from_config(cfg)?
    };

    match fetcher.load(url)? {
        FetchOutcome::Loaded(result) => {
            tracing::info!(
                "loaded {} ({} bytes, cached: {})",
                result.url,
                result.body.len(),
                result.from_cache
            );
            if raw {
                print!("{}", result.body);
            } else {
                print!("{}", render::show(&result.body));
            }
            Ok(0)
        }
        FetchOutcome::TooManyRedirects { url, limit } => {
            println!("[too many redirects] gave up at {url} after {limit} redirects");
            Ok(EXIT_NO_BODY)
        }
        FetchOutcome::HttpStatus {
            url,
            status,
            reason,
            ..
        } => {
            println!("[HTTP {status} {reason}] {url}");
            Ok(EXIT_NO_BODY)
        }
    }
}
