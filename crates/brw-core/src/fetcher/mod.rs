//! Fetch orchestration.
//!
//! One `load` walks this loop until it reaches a terminal state:
//!
//! 1. Look the current URL up in the cache; a fresh hit ends the load.
//! 2. `data:` and `file:` URLs are answered locally.
//! 3. Otherwise connect, exchange, and look at the status:
//!    - 301: resolve `Location`, spend one unit of redirect budget, and go
//!      back to 1 with the new URL. An empty budget ends the load with
//!      [`FetchOutcome::TooManyRedirects`].
//!    - 2xx: decode the body, store it if the response allows, done.
//!    - anything else: [`FetchOutcome::HttpStatus`].
//!
//! A `view-source:` wrapper is peeled off before the loop and applied to
//! the final body.

mod budget;
mod local;


use anyhow::Result;
use std::sync::Arc;

use crate::cache::{self, CacheStore, DiskCache, MemoryCache, NoCache};
use crate::config::{BrwConfig, CacheBackend};
use crate::decode::decode_body;
use crate::entities;
use crate::error::{ExchangeError, FetchError, ParseError};
use crate::headers::ResponseHeaders;
use crate::net::{self, Connector, TcpConnector};
use crate::url_model::{self, Url};

pub use budget::{RedirectBudget, MAX_REDIRECTS};

/// A successfully loaded resource. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// URL the body came from, after redirects.
    pub url: String,
    pub headers: ResponseHeaders,
    pub body: String,
    pub from_cache: bool,
}

/// How a load ended. Fatal problems are `FetchError`s instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(FetchResult),
    /// The redirect budget ran out at `url`.
    TooManyRedirects { url: String, limit: u32 },
    /// Final response was neither 2xx nor 301.
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
        headers: ResponseHeaders,
    },
}

impl FetchOutcome {
    pub fn loaded(self) -> Option<FetchResult> {
        match self {
            FetchOutcome::Loaded(r) => Some(r),
            _ => None,
        }
    }
}

/// Loads URLs through an injected connector and cache.
pub struct Fetcher {
    connector: Box<dyn Connector>,
    cache: Arc<dyn CacheStore>,
    max_redirects: u32,
    user_agent: String,
}

impl Fetcher {
    pub fn new(connector: Box<dyn Connector>, cache: Arc<dyn CacheStore>) -> Self {
        let defaults = BrwConfig::default();
        Self {
            connector,
            cache,
            max_redirects: defaults.max_redirects,
            user_agent: defaults.user_agent,
        }
    }

    /// Real sockets plus the cache backend named in `cfg`.
    pub fn from_config(cfg: &BrwConfig) -> Result<Self> {
        let cache: Arc<dyn CacheStore> = match cfg.cache_backend() {
            CacheBackend::Memory => Arc::new(MemoryCache::new()),
            CacheBackend::Disk => Arc::new(match &cfg.cache_dir {
                Some(dir) => DiskCache::open(dir)?,
                None => DiskCache::open_default()?,
            }),
            CacheBackend::Off => Arc::new(NoCache),
        };
        Ok(Self::new(Box::new(TcpConnector::from_config(cfg)), cache)
            .with_max_redirects(cfg.max_redirects)
            .with_user_agent(cfg.user_agent.clone()))
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Parse and load `raw`.
    pub fn load(&self, raw: &str) -> Result<FetchOutcome, FetchError> {
        let url = url_model::parse(raw)?;
        self.load_url(url)
    }

    pub fn load_url(&self, url: Url) -> Result<FetchOutcome, FetchError> {
        let (target, view_source) = url.into_fetch_target();
        let outcome = self.follow(target)?;
        Ok(match outcome {
            FetchOutcome::Loaded(mut result) if view_source => {
                result.body = entities::view_source(&result.body);
                FetchOutcome::Loaded(result)
            }
            other => other,
        })
    }

    fn follow(&self, mut current: Url) -> Result<FetchOutcome, FetchError> {
        let mut budget = RedirectBudget::new(self.max_redirects);

        loop {
            if let Some(key) = current.cache_key() {
                if let Some(entry) = self.cache.get(&key) {
                    tracing::debug!("cache hit for {key}");
                    return Ok(FetchOutcome::Loaded(FetchResult {
                        url: current.to_string(),
                        headers: entry.headers,
                        body: entry.body,
                        from_cache: true,
                    }));
                }
                tracing::debug!("cache miss for {key}");
            }

            let loc = match &current {
                Url::Data { content, .. } => {
                    return Ok(FetchOutcome::Loaded(FetchResult {
                        url: current.to_string(),
                        headers: ResponseHeaders::new(),
                        body: content.clone(),
                        from_cache: false,
                    }));
                }
                Url::File { path } => {
                    let body = local::read_file(path)?;
                    return Ok(FetchOutcome::Loaded(FetchResult {
                        url: current.to_string(),
                        headers: ResponseHeaders::new(),
                        body,
                        from_cache: false,
                    }));
                }
                Url::Http(loc) | Url::Https(loc) => loc,
                Url::ViewSource(_) => return Err(ParseError::NestedViewSource.into()),
            };

            let transport = self
                .connector
                .connect(&loc.host, loc.port, current.is_secure())?;
            let response = net::exchange(transport, current.scheme(), loc, &self.user_agent)?;

            match response.status {
                301 => {
                    let location = response
                        .headers
                        .get("location")
                        .ok_or(ExchangeError::MissingLocation)?;
                    if !budget.consume() {
                        tracing::warn!(
                            "giving up on {current} after {} redirects",
                            budget.limit()
                        );
                        return Ok(FetchOutcome::TooManyRedirects {
                            url: current.to_string(),
                            limit: budget.limit(),
                        });
                    }
                    let next = current.resolve_redirect(location)?;
                    tracing::debug!(
                        "301 {current} -> {next} ({} redirects left)",
                        budget.remaining()
                    );
                    current = next;
                }
                200..=299 => {
                    let body = decode_body(response.body, &response.headers)?;
                    self.maybe_store(&current, &response.headers, &body);
                    return Ok(FetchOutcome::Loaded(FetchResult {
                        url: current.to_string(),
                        headers: response.headers,
                        body,
                        from_cache: false,
                    }));
                }
                status => {
                    tracing::debug!("{current} answered {status} {}", response.reason);
                    return Ok(FetchOutcome::HttpStatus {
                        url: current.to_string(),
                        status,
                        reason: response.reason,
                        headers: response.headers,
                    });
                }
            }
        }
    }

    fn maybe_store(&self, url: &Url, headers: &ResponseHeaders, body: &str) {
        let Some(key) = url.cache_key() else {
            return;
        };
        let Some(ttl) = cache::ttl_from_headers(headers) else {
            return;
        };
        match self.cache.put(&key, headers, body, ttl) {
            Ok(()) => tracing::info!("cached {key} for {}s", ttl.as_secs()),
            Err(e) => tracing::warn!("failed to cache {key}: {e}"),
        }
    }
}
