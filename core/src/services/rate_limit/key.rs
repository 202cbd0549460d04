//! Rate-limit key derivation

/// Namespace prepended to every rate-limit key
pub const RATE_LIMIT_PREFIX: &str = "ratelimit";

/// Separates the normalized identity from the route name
pub const KEY_SEPARATOR: char = '#';

/// Replace address characters that would be ambiguous inside a key
///
/// Colons (IPv6) become underscores. The separator itself is escaped the
/// same way so an identity can never inject a route boundary.
pub fn normalize_identity(identity: &str) -> String {
    identity
        .chars()
        .map(|c| if c == ':' || c == KEY_SEPARATOR { '_' } else { c })
        .collect()
}

/// `ratelimit<normalized-identity>#<route>`
pub fn rate_limit_key(identity: &str, route: &str) -> String {
    format!(
        "{}{}{}{}",
        RATE_LIMIT_PREFIX,
        normalize_identity(identity),
        KEY_SEPARATOR,
        route
    )
}

/// Split a key back into its normalized identity and route
pub fn split_rate_limit_key(key: &str) -> Option<(&str, &str)> {
    key.strip_prefix(RATE_LIMIT_PREFIX)?
        .split_once(KEY_SEPARATOR)
}
