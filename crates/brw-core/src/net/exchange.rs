//! One HTTP/1.1 GET over an owned transport.
//!
//! The request always asks for `Connection: close`, so the body is whatever
//! the peer sends after the header block until it closes. Chunked and gzip
//! framing are left in place here; `decode` removes them.

use std::io::{self, BufRead, BufReader, Read, Write};

use super::parse::{parse_header_line, parse_status_line};
use super::Transport;
use crate::error::ExchangeError;
use crate::headers::ResponseHeaders;
use crate::url_model::{NetLocation, Scheme};

/// Status, headers and still-encoded body of a response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

/// Encode the request for `loc` as a single buffer.
pub fn build_request(scheme: Scheme, loc: &NetLocation, user_agent: &str) -> Vec<u8> {
    format!(
        "GET {} HTTP/1.1\r\n\
         Host: {}\r\n\
         Connection: close\r\n\
         User-Agent: {}\r\n\
         Accept-Encoding: gzip\r\n\
         \r\n",
        loc.request_target(),
        loc.authority(scheme),
        user_agent
    )
    .into_bytes()
}

/// Send a GET for `loc` and read the full response. The transport is
/// consumed and closed when this returns, on success or failure.
pub fn exchange(
    mut transport: Box<dyn Transport>,
    scheme: Scheme,
    loc: &NetLocation,
    user_agent: &str,
) -> Result<RawResponse, ExchangeError> {
    let request = build_request(scheme, loc, user_agent);
    transport.write_all(&request)?;
    transport.flush()?;
    tracing::debug!("sent GET {} to {}", loc.request_target(), loc.host);
    read_response(&mut *transport)
}

/// Parse a response from `reader`: status line, header block, then the rest
/// of the stream as the body.
pub fn read_response<R: Read>(reader: R) -> Result<RawResponse, ExchangeError> {
    let mut reader = BufReader::new(reader);

    let status_line = read_head_line(&mut reader)?.ok_or(ExchangeError::UnterminatedHeaders)?;
    let status = parse_status_line(&status_line)?;

    let mut headers = ResponseHeaders::new();
    loop {
        let line = read_head_line(&mut reader)?.ok_or(ExchangeError::UnterminatedHeaders)?;
        if line.is_empty() {
            break;
        }
        parse_header_line(&line, &mut headers);
    }

    let body = read_body(&mut reader)?;
    tracing::debug!(
        "response {} {} ({} headers, {} body bytes)",
        status.status,
        status.reason,
        headers.len(),
        body.len()
    );

    Ok(RawResponse {
        version: status.version,
        status: status.status,
        reason: status.reason,
        headers,
        body,
    })
}

/// Read one CRLF (or bare LF) terminated line. `None` means the stream
/// ended before a complete line arrived.
fn read_head_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, ExchangeError> {
    let mut buf = Vec::new();
    match reader.read_until(b'\n', &mut buf) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    if buf.last() != Some(&b'\n') {
        return Ok(None);
    }
    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Read until the peer closes. A TLS peer that skips `close_notify`
/// surfaces as `UnexpectedEof`, which still ends the body.
fn read_body<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut body = Vec::new();
    match reader.read_to_end(&mut body) {
        Ok(_) => Ok(body),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(body),
        Err(e) => Err(e),
    }
}
