//! Target path resolution for the catch-all proxy.
//!
//! The client path after `/proxy/` is forwarded 1:1. The only rule applied is
//! a traversal guard: `.` and `..` segments (including percent-encoded forms)
//! are rejected so a client cannot escape the backend's path space.

use crate::error::GatewayError;

/// Prefix under which the catch-all proxy is mounted.
pub const PROXY_PREFIX: &str = "/proxy";

/// Extract and validate the backend path from an inbound URI path.
///
/// `"/proxy/api/users/1"` resolves to `"api/users/1"`. Percent-encoding is
/// kept as the client sent it.
pub fn resolve_target_path(uri_path: &str) -> Result<String, GatewayError> {
    let rest = uri_path.strip_prefix(PROXY_PREFIX).unwrap_or(uri_path);
    let joined = rest.trim_start_matches('/');

    if let Some(segment) = joined.split('/').find(|s| is_dot_segment(s)) {
        return Err(GatewayError::InvalidRequestFormat(format!(
            "Path segment '{}' is not allowed",
            segment
        )));
    }

    Ok(joined.to_string())
}

/// Build `<base>/<path><?query>`. `base` must not end with a slash.
pub fn build_target_url(base: &str, target_path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{}/{}?{}", base, target_path, q),
        None => format!("{}/{}", base, target_path),
    }
}

fn is_dot_segment(segment: &str) -> bool {
    let lowered = segment.to_ascii_lowercase();
    let decoded = lowered.replace("%2e", ".");
    decoded == "." || decoded == ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_nested_path() {
        assert_eq!(resolve_target_path("/proxy/update-profile").unwrap(), "update-profile");
        assert_eq!(resolve_target_path("/proxy/api/users/u1").unwrap(), "api/users/u1");
        assert_eq!(resolve_target_path("/proxy/a%20b").unwrap(), "a%20b");
    }

    #[test]
    fn test_rejects_traversal() {
        for path in ["/proxy/../admin", "/proxy/api/./x", "/proxy/%2e%2e/etc", "/proxy/a/.%2E"] {
            let err = resolve_target_path(path).unwrap_err();
            assert_eq!(err.status_code().as_u16(), 400, "{path}");
        }
        assert!(resolve_target_path("/proxy/..hidden/file").is_ok());
    }

    #[test]
    fn test_build_target_url() {
        assert_eq!(
            build_target_url("http://localhost:8000", "update-profile", None),
            "http://localhost:8000/update-profile"
        );
        assert_eq!(
            build_target_url("http://backend", "api/items", Some("page=2&lang=en")),
            "http://backend/api/items?page=2&lang=en"
        );
    }
}
