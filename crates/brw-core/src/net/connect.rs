//! TCP connector with optional TLS (rustls + Mozilla roots).

use rustls::pki_types::ServerName;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::{Connector, Transport};
use crate::config::BrwConfig;
use crate::error::ConnectionError;

static DEFAULT_CLIENT_CONFIG: OnceLock<Arc<rustls::ClientConfig>> = OnceLock::new();

/// Default TLS client config: webpki roots, no client auth. Built once.
fn default_client_config() -> Arc<rustls::ClientConfig> {
    DEFAULT_CLIENT_CONFIG
        .get_or_init(|| {
            let mut root_store = rustls::RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            Arc::new(
                rustls::ClientConfig::builder()
                    .with_root_certificates(root_store)
                    .with_no_client_auth(),
            )
        })
        .clone()
}

/// Opens real sockets. Timeouts are optional; `None` blocks indefinitely.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new(connect_timeout: Option<Duration>, read_timeout: Option<Duration>) -> Self {
        Self {
            connect_timeout,
            read_timeout,
        }
    }

    pub fn from_config(cfg: &BrwConfig) -> Self {
        Self::new(
            cfg.connect_timeout_secs.map(Duration::from_secs),
            cfg.read_timeout_secs.map(Duration::from_secs),
        )
    }

    fn open_tcp(&self, host: &str, port: u16) -> Result<TcpStream, ConnectionError> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| ConnectionError::Resolve {
                host: host.to_string(),
                port,
                source,
            })?
            .collect();

        let mut last_err = None;
        for addr in &addrs {
            let attempt = match self.connect_timeout {
                Some(t) => TcpStream::connect_timeout(addr, t),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    tracing::debug!("connected to {host}:{port} via {addr}");
                    return Ok(stream);
                }
                Err(e) => {
                    tracing::debug!("connect to {addr} failed: {e}");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(source) => Err(ConnectionError::Connect {
                host: host.to_string(),
                port,
                source,
            }),
            None => Err(ConnectionError::NoAddress {
                host: host.to_string(),
                port,
            }),
        }
    }

    fn wrap_tls(
        &self,
        mut stream: TcpStream,
        host: &str,
    ) -> Result<rustls::StreamOwned<rustls::ClientConnection, TcpStream>, ConnectionError> {
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| ConnectionError::InvalidServerName(host.to_string()))?;
        let mut conn = rustls::ClientConnection::new(default_client_config(), server_name)
            .map_err(|source| ConnectionError::TlsSetup {
                host: host.to_string(),
                source,
            })?;
        // Drive the handshake now so certificate failures surface as
        // connection errors rather than mid-exchange I/O errors.
        while conn.is_handshaking() {
            conn.complete_io(&mut stream)
                .map_err(|source| ConnectionError::Handshake {
                    host: host.to_string(),
                    source,
                })?;
        }
        Ok(rustls::StreamOwned::new(conn, stream))
    }
}

impl Connector for TcpConnector {
    fn connect(
        &self,
        host: &str,
        port: u16,
        secure: bool,
    ) -> Result<Box<dyn Transport>, ConnectionError> {
        let stream = self.open_tcp(host, port)?;
        let io_err = |source| ConnectionError::Connect {
            host: host.to_string(),
            port,
            source,
        };
        stream.set_read_timeout(self.read_timeout).map_err(io_err)?;
        stream.set_write_timeout(self.read_timeout).map_err(io_err)?;

        if secure {
            let tls = self.wrap_tls(stream, host)?;
            tracing::debug!("TLS established with {host}");
            Ok(Box::new(tls))
        } else {
            Ok(Box::new(stream))
        }
    }
}
