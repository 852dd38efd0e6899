//! Parse the status line and header lines of an HTTP/1.1 response.

use crate::error::ExchangeError;
use crate::headers::ResponseHeaders;

/// Parsed `HTTP/1.1 200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusLine {
    pub version: String,
    pub status: u16,
    pub reason: String,
}

/// Split the status line into version, numeric status and reason. The
/// reason is everything after the second space and may itself contain
/// spaces or be empty.
pub(crate) fn parse_status_line(line: &str) -> Result<StatusLine, ExchangeError> {
    let malformed = || ExchangeError::MalformedStatusLine(line.to_string());

    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or("");
    let status = parts.next().ok_or_else(malformed)?;
    let reason = parts.next().unwrap_or("");

    if !version.starts_with("HTTP/") {
        return Err(malformed());
    }
    if status.len() != 3 || !status.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let status = status.parse::<u16>().map_err(|_| malformed())?;

    Ok(StatusLine {
        version: version.to_string(),
        status,
        reason: reason.trim().to_string(),
    })
}

/// Add one `Name: value` line to `headers`. Lines without a colon are
/// skipped.
pub(crate) fn parse_header_line(line: &str, headers: &mut ResponseHeaders) {
    match line.split_once(':') {
        Some((name, value)) => headers.insert(name, value),
        None => tracing::warn!("skipping malformed header line: {line:?}"),
    }
}
