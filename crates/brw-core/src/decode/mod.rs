//! Body decoding: transfer framing first, then content coding, then UTF-8.

mod chunked;

use flate2::read::GzDecoder;
use std::io::Read;

use crate::error::DecodeError;
use crate::headers::ResponseHeaders;

pub use chunked::dechunk;

/// True when the last listed transfer coding is `chunked`.
pub fn is_chunked(headers: &ResponseHeaders) -> bool {
    headers
        .get("transfer-encoding")
        .and_then(|v| v.rsplit(',').next())
        .is_some_and(|last| last.trim().eq_ignore_ascii_case("chunked"))
}

/// Undo `Transfer-Encoding: chunked` and `Content-Encoding: gzip`, in that
/// order, and decode the result as UTF-8.
pub fn decode_body(raw: Vec<u8>, headers: &ResponseHeaders) -> Result<String, DecodeError> {
    let payload = if is_chunked(headers) {
        dechunk(&raw)?
    } else {
        raw
    };

    let payload = match headers.get("content-encoding").map(str::trim) {
        None | Some("") => payload,
        Some(enc) if enc.eq_ignore_ascii_case("identity") => payload,
        Some(enc) if enc.eq_ignore_ascii_case("gzip") || enc.eq_ignore_ascii_case("x-gzip") => {
            gunzip(&payload)?
        }
        Some(enc) => return Err(DecodeError::UnsupportedEncoding(enc.to_string())),
    };

    Ok(String::from_utf8(payload)?)
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(DecodeError::Gzip)?;
    Ok(out)
}
