//! Decide whether, and for how long, a response may be cached.

use std::time::Duration;

use crate::headers::ResponseHeaders;

/// Longest lifetime granted to any response (about 68 years).
pub const MAX_TTL_SECS: u64 = i32::MAX as u64;

/// Lifetime for a response, or `None` if it must not be stored.
///
/// Requires a `Cache-Control: max-age=<digits>` directive; `no-store`
/// vetoes it. The lifetime is `max-age` minus the `Age` header (0 when
/// absent or unparseable). A result of zero or less means the response is
/// already stale and is not stored. Lifetimes are capped at
/// [`MAX_TTL_SECS`]; a `max-age` too large for `u64` is capped as well.
pub fn ttl_from_headers(headers: &ResponseHeaders) -> Option<Duration> {
    let cache_control = headers.get("cache-control")?;

    let mut max_age = None;
    for directive in cache_control.split(',') {
        let directive = directive.trim();
        if directive.eq_ignore_ascii_case("no-store") {
            return None;
        }
        if let Some((name, value)) = directive.split_once('=') {
            if name.trim().eq_ignore_ascii_case("max-age") {
                let value = value.trim();
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    max_age = Some(value.parse::<u64>().unwrap_or(u64::MAX));
                }
            }
        }
    }

    let age = headers
        .get("age")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    match max_age?.checked_sub(age) {
        Some(ttl) if ttl > 0 => Some(Duration::from_secs(ttl.min(MAX_TTL_SECS))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl(pairs: &[(&str, &str)]) -> Option<Duration> {
        let headers: ResponseHeaders = pairs.iter().copied().collect();
        ttl_from_headers(&headers)
    }

    #[test]
    fn max_age_minus_age() {
        assert_eq!(
            ttl(&[("Cache-Control", "max-age=100"), ("Age", "40")]),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn age_defaults_to_zero() {
        assert_eq!(
            ttl(&[("Cache-Control", "public, max-age=300")]),
            Some(Duration::from_secs(300))
        );
        assert_eq!(
            ttl(&[("Cache-Control", "max-age=300"), ("Age", "soon")]),
            Some(Duration::from_secs(300))
        );
    }

    #[test]
    fn stale_at_write_time_is_not_stored() {
        assert_eq!(ttl(&[("Cache-Control", "max-age=40"), ("Age", "40")]), None);
        assert_eq!(ttl(&[("Cache-Control", "max-age=10"), ("Age", "40")]), None);
        assert_eq!(ttl(&[("Cache-Control", "max-age=0")]), None);
    }

    #[test]
    fn requires_numeric_max_age() {
        assert_eq!(ttl(&[]), None);
        assert_eq!(ttl(&[("Cache-Control", "no-cache")]), None);
        assert_eq!(ttl(&[("Cache-Control", "max-age=-5")]), None);
        assert_eq!(ttl(&[("Cache-Control", "max-age=\"60\"")]), None);
    }

    #[test]
    fn huge_max_age_is_capped() {
        assert_eq!(
            ttl(&[("Cache-Control", "max-age=18446744073709551615")]),
            Some(Duration::from_secs(MAX_TTL_SECS))
        );
        assert_eq!(
            ttl(&[("Cache-Control", "max-age=99999999999999999999999")]),
            Some(Duration::from_secs(MAX_TTL_SECS))
        );
        assert_eq!(
            ttl(&[("Cache-Control", "max-age=3000000000"), ("Age", "100")]),
            Some(Duration::from_secs(MAX_TTL_SECS))
        );
    }

    #[test]
    fn no_store_wins() {
        assert_eq!(ttl(&[("Cache-Control", "max-age=60, no-store")]), None);
    }
}
