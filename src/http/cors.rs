//! Headers stamped onto every response
//!
//! CORS is unconditional: downloads are meant to be fetched from any origin.

use hyper::header::{HeaderMap, HeaderValue, SERVER};
use hyper::Response;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "*";

/// Add the CORS headers and the `Server` header, replacing existing values
pub fn apply_default_headers<B>(response: &mut Response<B>, server_name: &str) {
    let headers = response.headers_mut();
    insert_cors_headers(headers);
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
}

fn insert_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_applied() {
        let mut resp = Response::new(());
        apply_default_headers(&mut resp, "apk-depot/test");
        let h = resp.headers();
        assert_eq!(h["access-control-allow-origin"], "*");
        assert_eq!(h["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(h["access-control-allow-headers"], "*");
        assert_eq!(h["server"], "apk-depot/test");
    }

    #[test]
    fn test_invalid_server_name_skipped() {
        let mut resp = Response::new(());
        apply_default_headers(&mut resp, "bad\nname");
        assert!(resp.headers().get("server").is_none());
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}
