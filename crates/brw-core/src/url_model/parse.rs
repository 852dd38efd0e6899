//! Raw string to [`Url`].

use super::{NetLocation, Scheme, Url};
use crate::error::ParseError;

/// Parse a raw URL string.
///
/// `http://host` without a path is accepted and normalized to path `/`.
pub fn parse(raw: &str) -> Result<Url, ParseError> {
    let raw = raw.trim();
    let (scheme, rest) = split_scheme(raw)?;
    match scheme {
        Scheme::ViewSource => {
            let (inner_scheme, inner_rest) = split_scheme(rest)?;
            if inner_scheme == Scheme::ViewSource {
                return Err(ParseError::NestedViewSource);
            }
            let inner = parse_with_scheme(rest, inner_scheme, inner_rest)?;
            Ok(Url::ViewSource(Box::new(inner)))
        }
        _ => parse_with_scheme(raw, scheme, rest),
    }
}

fn split_scheme(raw: &str) -> Result<(Scheme, &str), ParseError> {
    let (name, rest) = raw
        .split_once(':')
        .ok_or_else(|| ParseError::MissingScheme(raw.to_string()))?;
    let scheme =
        Scheme::from_name(name).ok_or_else(|| ParseError::UnsupportedScheme(name.to_string()))?;
    Ok((scheme, rest))
}

fn parse_with_scheme(raw: &str, scheme: Scheme, rest: &str) -> Result<Url, ParseError> {
    match scheme {
        Scheme::Data => parse_data(raw, rest),
        Scheme::File => {
            let (host, port, path) = split_authority(raw, rest)?;
            if port.is_some() || !(host.is_empty() || host.eq_ignore_ascii_case("localhost")) {
                return Err(ParseError::RemoteFileHost(host.to_string()));
            }
            Ok(Url::File { path })
        }
        Scheme::Http | Scheme::Https => {
            let (host, port, path) = split_authority(raw, rest)?;
            if host.is_empty() {
                return Err(ParseError::MissingHost(raw.to_string()));
            }
            let port = match port {
                Some(p) => p,
                // Http and Https always have a default port.
                None => scheme.default_port().unwrap_or(80),
            };
            let loc = NetLocation {
                host: host.to_ascii_lowercase(),
                port,
                path,
            };
            Ok(if scheme == Scheme::Https {
                Url::Https(loc)
            } else {
                Url::Http(loc)
            })
        }
        Scheme::ViewSource => Err(ParseError::NestedViewSource),
    }
}

/// `data:<media type>,<content>`; content is kept literally.
fn parse_data(raw: &str, rest: &str) -> Result<Url, ParseError> {
    let (media_type, content) = rest
        .split_once(',')
        .ok_or_else(|| ParseError::MissingDataSeparator(raw.to_string()))?;
    Ok(Url::Data {
        media_type: media_type.to_string(),
        content: content.to_string(),
    })
}

/// Split `//host[:port]/path` into its parts. A missing path becomes `/`.
fn split_authority<'a>(
    raw: &str,
    rest: &'a str,
) -> Result<(&'a str, Option<u16>, String), ParseError> {
    let rest = rest
        .strip_prefix("//")
        .ok_or_else(|| ParseError::MissingAuthority(raw.to_string()))?;

    let (host_spec, path) = match rest.find(['/', '?', '#']) {
        Some(i) if rest.as_bytes()[i] == b'/' => (&rest[..i], rest[i..].to_string()),
        Some(i) => (&rest[..i], format!("/{}", &rest[i..])),
        None => (rest, "/".to_string()),
    };

    match host_spec.split_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| ParseError::InvalidPort(port.to_string()))?;
            Ok((host, Some(port), path))
        }
        None => Ok((host_spec, None, path)),
    }
}
