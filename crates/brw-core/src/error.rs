//! Error taxonomy for the fetch pipeline.
//!
//! Each stage has its own error type so callers can tell a bad URL from a
//! refused connection from a garbled response. `FetchError` wraps them all
//! for `Fetcher::load`. Redirect exhaustion and non-2xx statuses are not
//! errors; see `fetcher::FetchOutcome`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed or unsupported URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing `:` after scheme in `{0}`")]
    MissingScheme(String),
    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("`{0}` is missing `//` after the scheme")]
    MissingAuthority(String),
    #[error("`{0}` has no host")]
    MissingHost(String),
    #[error("invalid port `{0}`")]
    InvalidPort(String),
    #[error("data URL `{0}` has no `,` before its content")]
    MissingDataSeparator(String),
    #[error("view-source cannot wrap another view-source URL")]
    NestedViewSource,
    #[error("file URL host must be empty or localhost, got `{0}`")]
    RemoteFileHost(String),
    #[error("redirect to `{0}` is not allowed")]
    ForbiddenRedirect(String),
}

/// DNS, TCP or TLS failure while opening a transport.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("could not resolve {host}:{port}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("{host}:{port} resolved to no addresses")]
    NoAddress { host: String, port: u16 },
    #[error("could not connect to {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("invalid TLS server name `{0}`")]
    InvalidServerName(String),
    #[error("TLS setup failed for {host}")]
    TlsSetup {
        host: String,
        #[source]
        source: rustls::Error,
    },
    #[error("TLS handshake with {host} failed")]
    Handshake {
        host: String,
        #[source]
        source: io::Error,
    },
}

/// Malformed HTTP response framing.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("I/O error during HTTP exchange")]
    Io(#[from] io::Error),
    #[error("malformed status line `{0}`")]
    MalformedStatusLine(String),
    #[error("connection closed before the end of the header block")]
    UnterminatedHeaders,
    #[error("301 response without a Location header")]
    MissingLocation,
}

/// Failure while turning raw body bytes into text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("bad chunked framing: {0}")]
    Chunked(String),
    #[error("gzip decompression failed")]
    Gzip(#[source] io::Error),
    #[error("unsupported content-encoding `{0}`")]
    UnsupportedEncoding(String),
    #[error("body is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Cache backend failure. Never fatal to a fetch.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cache entry at {path} is corrupt")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not locate the XDG cache directory")]
    NoCacheDir(#[from] xdg::BaseDirectoriesError),
}

/// Any fatal failure of a single `load`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("could not read {path}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
