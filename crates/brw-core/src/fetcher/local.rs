//! `file:` and `data:` URLs, answered without touching the network.

use std::fs;
use std::path::PathBuf;

use crate::error::{DecodeError, FetchError};

/// Read a `file:` path as UTF-8 text. Percent-escapes are decoded and any
/// query or fragment is ignored.
pub(crate) fn read_file(path: &str) -> Result<String, FetchError> {
    let path = to_fs_path(path);
    tracing::debug!("reading {}", path.display());
    let bytes = fs::read(&path).map_err(|source| FetchError::File {
        path: path.clone(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| DecodeError::Utf8(e).into())
}

fn to_fs_path(path: &str) -> PathBuf {
    url::Url::parse(&format!("file://{path}"))
        .ok()
        .and_then(|u| u.to_file_path().ok())
        .unwrap_or_else(|| PathBuf::from(path))
}
