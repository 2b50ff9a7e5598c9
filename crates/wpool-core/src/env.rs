//! Environment variable utilities.
//!
//! Generic `env_get<T>` function for parsing environment variables with
//! defaults, used by [`crate`] consumers (notably `wpool_runtime::config`)
//! to apply runtime overrides on top of compile-time defaults.

use std::str::FromStr;

/// Get environment variable parsed as type `T`, or return `default`.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean.
///
/// Accepts `"1"`, `"true"`, `"yes"`, `"on"` (case-insensitive) as true.
/// Everything else (including unset) returns `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Get environment variable as a string, or return `default`.
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_default() {
        let val: usize = env_get("__WPOOL_TEST_UNSET__", 42);
        assert_eq!(val, 42);
    }

    #[test]
    fn test_env_get_bool_variants() {
        std::env::set_var("__WPOOL_TEST_BOOL__", "yes");
        assert!(env_get_bool("__WPOOL_TEST_BOOL__", false));
        std::env::set_var("__WPOOL_TEST_BOOL__", "0");
        assert!(!env_get_bool("__WPOOL_TEST_BOOL__", true));
        std::env::remove_var("__WPOOL_TEST_BOOL__");
    }

    #[test]
    fn test_env_get_str_default() {
        let val = env_get_str("__WPOOL_TEST_UNSET__", "hello");
        assert_eq!(val, "hello");
    }
}
