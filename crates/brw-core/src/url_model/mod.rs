//! URL modeling for the supported schemes.
//!
//! A raw URL string is parsed into [`Url`], one variant per scheme, so the
//! rest of the pipeline never has to re-inspect strings to decide how to
//! fetch something:
//! - `http` / `https` carry a [`NetLocation`] (host, port, path).
//! - `file` carries an absolute path.
//! - `data` carries the media type label and literal content.
//! - `view-source` wraps one of the above; the wrapped URL drives transport,
//!   the wrapper only changes how the body is presented.

mod parse;
mod resolve;

use std::fmt;

pub use parse::parse;

/// URL scheme selecting the retrieval mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    File,
    Data,
    ViewSource,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::File => "file",
            Scheme::Data => "data",
            Scheme::ViewSource => "view-source",
        }
    }

    /// Port used when the URL does not name one (network schemes only).
    pub fn default_port(self) -> Option<u16> {
        match self {
            Scheme::Http => Some(80),
            Scheme::Https => Some(443),
            _ => None,
        }
    }

    /// Case-insensitive lookup of a scheme name.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            "file" => Some(Scheme::File),
            "data" => Some(Scheme::Data),
            "view-source" => Some(Scheme::ViewSource),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a network resource lives. `path` always starts with `/` and may
/// carry a query and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetLocation {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl NetLocation {
    /// Path and query as sent on the request line; the fragment is dropped.
    pub fn request_target(&self) -> &str {
        match self.path.find('#') {
            Some(i) => &self.path[..i],
            None => &self.path,
        }
    }

    /// `host` or `host:port`, omitting the port when it is the default for `scheme`.
    pub fn authority(&self, scheme: Scheme) -> String {
        if scheme.default_port() == Some(self.port) {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// A parsed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Url {
    Http(NetLocation),
    Https(NetLocation),
    File { path: String },
    Data { media_type: String, content: String },
    ViewSource(Box<Url>),
}

impl Url {
    pub fn scheme(&self) -> Scheme {
        match self {
            Url::Http(_) => Scheme::Http,
            Url::Https(_) => Scheme::Https,
            Url::File { .. } => Scheme::File,
            Url::Data { .. } => Scheme::Data,
            Url::ViewSource(_) => Scheme::ViewSource,
        }
    }

    /// Scheme that governs transport: the wrapped one for `view-source`.
    pub fn transport_scheme(&self) -> Scheme {
        match self {
            Url::ViewSource(inner) => inner.scheme(),
            other => other.scheme(),
        }
    }

    pub fn is_secure(&self) -> bool {
        self.transport_scheme() == Scheme::Https
    }

    pub fn net_location(&self) -> Option<&NetLocation> {
        match self {
            Url::Http(loc) | Url::Https(loc) => Some(loc),
            Url::ViewSource(inner) => inner.net_location(),
            Url::File { .. } | Url::Data { .. } => None,
        }
    }

    /// Split off a `view-source:` wrapper. Returns the URL to fetch and
    /// whether the body should be shown as source.
    pub fn into_fetch_target(self) -> (Url, bool) {
        match self {
            Url::ViewSource(inner) => (*inner, true),
            other => (other, false),
        }
    }

    /// Canonical cache key: `scheme://host[:port]/path` without query or
    /// fragment. `data:` URLs are never cached and have no key.
    pub fn cache_key(&self) -> Option<String> {
        match self {
            Url::Http(loc) | Url::Https(loc) => {
                let scheme = self.scheme();
                Some(format!(
                    "{}://{}{}",
                    scheme,
                    loc.authority(scheme),
                    strip_query(&loc.path)
                ))
            }
            Url::File { path } => Some(format!("file://{}", strip_query(path))),
            Url::Data { .. } => None,
            Url::ViewSource(inner) => inner.cache_key(),
        }
    }
}

fn strip_query(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(i) => &path[..i],
        None => path,
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Url::Http(loc) | Url::Https(loc) => {
                let scheme = self.scheme();
                write!(f, "{}://{}{}", scheme, loc.authority(scheme), loc.path)
            }
            Url::File { path } => write!(f, "file://{}", path),
            Url::Data {
                media_type,
                content,
            } => write!(f, "data:{},{}", media_type, content),
            Url::ViewSource(inner) => write!(f, "view-source:{}", inner),
        }
    }
}
