use std::str::FromStr;

/// Parses an environment variable, falling back to `default` when it is
/// unset or malformed.
pub(crate) fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a boolean flag. `false`, `0`, `no` and `off` disable it.
pub(crate) fn flag_or(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}
