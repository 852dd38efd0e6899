pub mod config;
pub mod logging;

// Fetch pipeline, leaf to root.
pub mod cache;
pub mod decode;
pub mod entities;
pub mod error;
pub mod fetcher;
pub mod headers;
pub mod net;
pub mod url_model;

pub use error::FetchError;
pub use fetcher::{FetchOutcome, FetchResult, Fetcher};
