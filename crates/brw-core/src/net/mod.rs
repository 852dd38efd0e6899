//! Network side of a fetch: opening a transport and running one HTTP/1.1
//! request/response exchange over it.
//!
//! Everything here is blocking. A transport is owned by a single exchange
//! and dropped (closed) when that exchange returns.

mod connect;
mod exchange;
mod parse;

use std::io::{Read, Write};

use crate::error::ConnectionError;

pub use connect::TcpConnector;
pub use exchange::{build_request, exchange, read_response, RawResponse};

/// A connected byte stream (plain TCP or TLS over TCP).
pub trait Transport: Read + Write + Send {}

impl<T: Read + Write + Send> Transport for T {}

/// Opens transports. Injected into the fetcher so tests can substitute
/// scripted servers.
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        host: &str,
        port: u16,
        secure: bool,
    ) -> Result<Box<dyn Transport>, ConnectionError>;
}
