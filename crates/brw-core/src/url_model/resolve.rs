//! Resolving a redirect `Location` against the URL that produced it.

use super::{parse, NetLocation, Url};
use crate::error::ParseError;

impl Url {
    /// Resolve a `Location` header value against `self`.
    ///
    /// - `scheme:...` is parsed as an absolute URL. Only a leading scheme
    ///   token counts, so `/login?next=http://x/` stays a path.
    /// - `//host/...` keeps the current scheme.
    /// - anything else is a path on the current scheme, host and port.
    ///
    /// Redirects may only land on network or data URLs.
    pub fn resolve_redirect(&self, location: &str) -> Result<Url, ParseError> {
        let location = location.trim();

        let target = if location.starts_with("//") {
            parse(&format!("{}:{}", self.transport_scheme(), location))?
        } else if has_scheme_prefix(location) {
            parse(location)?
        } else {
            let path = if location.starts_with('/') {
                location.to_string()
            } else {
                format!("/{}", location)
            };
            match self {
                Url::Http(loc) => Url::Http(with_path(loc, path)),
                Url::Https(loc) => Url::Https(with_path(loc, path)),
                Url::ViewSource(inner) => return inner.resolve_redirect(location),
                Url::File { .. } | Url::Data { .. } => {
                    return Err(ParseError::ForbiddenRedirect(location.to_string()))
                }
            }
        };

        match target {
            Url::ViewSource(_) | Url::File { .. } => {
                Err(ParseError::ForbiddenRedirect(location.to_string()))
            }
            other => Ok(other),
        }
    }
}

/// True when `location` starts with `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`.
fn has_scheme_prefix(location: &str) -> bool {
    let Some((name, _)) = location.split_once(':') else {
        return false;
    };
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn with_path(loc: &NetLocation, path: String) -> NetLocation {
    NetLocation {
        host: loc.host.clone(),
        port: loc.port,
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_absolute_location_keeps_origin() {
        let base = parse("https://example.org:8443/old/page").unwrap();
        let next = base.resolve_redirect("/new/page?x=1").unwrap();
        assert_eq!(next.to_string(), "https://example.org:8443/new/page?x=1");
    }

    #[test]
    fn bare_relative_location_gets_leading_slash() {
        let base = parse("http://example.org/a/b").unwrap();
        let next = base.resolve_redirect("c").unwrap();
        assert_eq!(next.to_string(), "http://example.org/c");
    }

    #[test]
    fn absolute_location_may_switch_scheme_and_host() {
        let base = parse("http://example.org/").unwrap();
        let next = base.resolve_redirect("https://www.example.org/home").unwrap();
        assert_eq!(next.to_string(), "https://www.example.org/home");
        assert!(next.is_secure());
    }

    #[test]
    fn protocol_relative_location_keeps_scheme() {
        let base = parse("https://example.org/").unwrap();
        let next = base.resolve_redirect("//cdn.example.org/x").unwrap();
        assert_eq!(next.to_string(), "https://cdn.example.org/x");
    }

    #[test]
    fn redirect_to_local_or_view_source_is_rejected() {
        let base = parse("http://example.org/").unwrap();
        assert!(matches!(
            base.resolve_redirect("file:///etc/passwd"),
            Err(ParseError::ForbiddenRedirect(_))
        ));
        assert!(matches!(
            base.resolve_redirect("view-source:http://example.org/"),
            Err(ParseError::ForbiddenRedirect(_))
        ));
    }

    #[test]
    fn url_in_query_does_not_make_location_absolute() {
        let base = parse("http://example.org/start").unwrap();
        let next = base
            .resolve_redirect("/login?next=http://example.org/home")
            .unwrap();
        assert_eq!(
            next.to_string(),
            "http://example.org/login?next=http://example.org/home"
        );

        let next = base.resolve_redirect("/a:b/c://d").unwrap();
        assert_eq!(next.to_string(), "http://example.org/a:b/c://d");

        let next = base.resolve_redirect("page?x=https://y/").unwrap();
        assert_eq!(next.to_string(), "http://example.org/page?x=https://y/");
    }

    #[test]
    fn scheme_prefix_detection() {
        assert!(has_scheme_prefix("http://a/"));
        assert!(has_scheme_prefix("HTTPS://a/"));
        assert!(has_scheme_prefix("data:text/plain,x"));
        assert!(has_scheme_prefix("view-source:http://a/"));
        assert!(!has_scheme_prefix("/login?next=http://a/"));
        assert!(!has_scheme_prefix("?q=http://a"));
        assert!(!has_scheme_prefix("1abc:x"));
        assert!(!has_scheme_prefix(":x"));
        assert!(!has_scheme_prefix("plain/path"));
    }

    #[test]
    fn redirect_to_data_url_is_allowed() {
        let base = parse("http://example.org/").unwrap();
        let next = base.resolve_redirect("data:text/plain,moved").unwrap();
        assert_eq!(
            next,
            Url::Data {
                media_type: "text/plain".to_string(),
                content: "moved".to_string(),
            }
        );
    }

    #[test]
    fn invalid_absolute_location_is_a_parse_error() {
        let base = parse("http://example.org/").unwrap();
        assert!(matches!(
            base.resolve_redirect("ftp://example.org/"),
            Err(ParseError::UnsupportedScheme(_))
        ));
    }
}
