//! Path normalization
//!
//! Turns whatever the transport hands us into the key used by the route table.

/// Normalize a raw request target into a route path.
///
/// Query and fragment are dropped, as are scheme and authority of an absolute
/// URL. The result always starts with exactly one `/`. Trailing slashes are
/// left alone, so `/ping/` and `/ping` stay distinct routes.
pub fn normalize(raw: &str) -> String {
    let path = strip_authority(raw);
    let path = path.split(['?', '#']).next().unwrap_or_default();
    format!("/{}", path.trim_start_matches('/'))
}

/// `http://host:port/path` -> `/path`; anything without a scheme is returned as-is
fn strip_authority(raw: &str) -> &str {
    let Some((scheme, rest)) = raw.split_once("://") else {
        return raw;
    };
    let is_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return raw;
    }
    rest.find(['/', '?', '#']).map_or("", |idx| &rest[idx..])
}
