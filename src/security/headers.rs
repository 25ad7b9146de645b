//! Header sanitization for outbound requests.
//!
//! # Responsibilities
//! - Strip connection-scoped headers (`host`, `connection`, `content-length`)
//! - Pin the outbound `Content-Type`
//!
//! # Design Decisions
//! - Everything else passes through untouched, duplicates included
//! - `content-length` is recomputed by the client from the buffered body
//! - Sanitizing an already sanitized map is a no-op

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

/// Headers that describe the inbound connection rather than the request.
pub const STRIPPED_HEADERS: [HeaderName; 3] =
    [header::HOST, header::CONNECTION, header::CONTENT_LENGTH];

/// Content type used when the client did not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Produce the header set to send upstream.
pub fn sanitize_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = inbound.clone();
    for name in &STRIPPED_HEADERS {
        outbound.remove(name);
    }

    let content_type = inbound
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    outbound.insert(header::CONTENT_TYPE, content_type);

    outbound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("kiosk.local:3000"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        headers.insert("x-kiosk-id", HeaderValue::from_static("k-7"));
        headers.append(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en"));
        headers.append(header::ACCEPT_LANGUAGE, HeaderValue::from_static("fil"));
        headers
    }

    #[test]
    fn test_strips_connection_headers() {
        let out = sanitize_headers(&inbound());
        assert!(out.get(header::HOST).is_none());
        assert!(out.get(header::CONNECTION).is_none());
        assert!(out.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(out.get("X-Kiosk-Id").unwrap(), "k-7");

        let langs: Vec<_> = out.get_all(header::ACCEPT_LANGUAGE).iter().collect();
        assert_eq!(langs, vec!["en", "fil"]);
    }

    #[test]
    fn test_content_type_defaults_to_json() {
        let out = sanitize_headers(&inbound());
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_content_type_is_preserved() {
        let mut headers = inbound();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=xyz"),
        );
        let out = sanitize_headers(&headers);
        assert_eq!(
            out.get(header::CONTENT_TYPE).unwrap(),
            "multipart/form-data; boundary=xyz"
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_headers(&inbound());
        let twice = sanitize_headers(&once);
        assert_eq!(once, twice);
    }
}
