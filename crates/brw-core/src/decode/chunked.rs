//! Chunked transfer-encoding.

use crate::error::DecodeError;

/// Reassemble a chunked body.
///
/// Each chunk is `<hex size>[;ext]\r\n<size bytes>\r\n`; a zero-size chunk
/// ends the body and anything after it (trailer fields) is ignored. Chunk
/// boundaries come from the declared sizes, so payloads may contain CRLF.
pub fn dechunk(raw: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut pos = 0;

    loop {
        let line_end = find_crlf(&raw[pos..])
            .ok_or_else(|| DecodeError::Chunked("missing chunk size line".to_string()))?;
        let size = parse_size_line(&raw[pos..pos + line_end])?;
        pos += line_end + 2;

        if size == 0 {
            return Ok(out);
        }

        let end = pos
            .checked_add(size)
            .filter(|&end| end <= raw.len())
            .ok_or_else(|| {
                DecodeError::Chunked(format!(
                    "chunk of {size} bytes truncated at {} bytes",
                    raw.len() - pos
                ))
            })?;
        out.extend_from_slice(&raw[pos..end]);
        pos = end;

        if raw.get(pos..pos + 2) != Some(&b"\r\n"[..]) {
            return Err(DecodeError::Chunked(
                "chunk payload not followed by CRLF".to_string(),
            ));
        }
        pos += 2;
    }
}

fn parse_size_line(line: &[u8]) -> Result<usize, DecodeError> {
    let line = std::str::from_utf8(line)
        .map_err(|_| DecodeError::Chunked("non-ASCII chunk size".to_string()))?;
    let digits = line.split(';').next().unwrap_or("").trim();
    usize::from_str_radix(digits, 16)
        .map_err(|_| DecodeError::Chunked(format!("invalid chunk size {digits:?}")))
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassembles_wikipedia() {
        let body = dechunk(b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n").unwrap();
        assert_eq!(body, b"Wikipedia");
    }

    #[test]
    fn payload_may_contain_crlf_and_sizes_span_digits() {
        let payload = "line one\r\nline two\r\n".repeat(2);
        let raw = format!("{:x}\r\n{}\r\n3\r\nend\r\n0\r\n\r\n", payload.len(), payload);
        assert!(payload.len() > 15);
        let body = dechunk(raw.as_bytes()).unwrap();
        assert_eq!(body, format!("{payload}end").as_bytes());
    }

    #[test]
    fn ignores_extensions_and_trailers() {
        let raw = b"5;name=value\r\nhello\r\n0\r\nExpires: never\r\n\r\n";
        assert_eq!(dechunk(raw).unwrap(), b"hello");
    }

    #[test]
    fn uppercase_hex_sizes() {
        let payload = "x".repeat(0x1A);
        let raw = format!("1A\r\n{payload}\r\n0\r\n\r\n");
        assert_eq!(dechunk(raw.as_bytes()).unwrap(), payload.as_bytes());
    }

    #[test]
    fn truncated_chunk_is_an_error() {
        assert!(matches!(
            dechunk(b"a\r\nshort\r\n"),
            Err(DecodeError::Chunked(_))
        ));
    }

    #[test]
    fn missing_terminal_chunk_is_an_error() {
        assert!(matches!(
            dechunk(b"4\r\nWiki\r\n"),
            Err(DecodeError::Chunked(_))
        ));
    }

    #[test]
    fn bad_size_or_framing_is_an_error() {
        assert!(matches!(dechunk(b"zz\r\n"), Err(DecodeError::Chunked(_))));
        assert!(matches!(
            dechunk(b"4\r\nWikiX\r\n0\r\n\r\n"),
            Err(DecodeError::Chunked(_))
        ));
    }
}
