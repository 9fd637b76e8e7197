//! HTTP response building module
//!
//! Provides builders for the status codes both sites answer with.

use hyper::body::Bytes;
use hyper::Response;

use super::body::{self, ResponseBody};
use crate::error::ServeError;

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(304)
        .header("Last-Modified", last_modified)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(body::empty())
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(body::full("404 Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(body::full("404 Not Found"))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(body::full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(body::full("405 Method Not Allowed"))
        })
}

/// Build 500 Internal Server Error response carrying the failure description
pub fn build_500_response(detail: &str) -> Response<ResponseBody> {
    let message = format!("500 Internal Server Error: {detail}");
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(body::full(message))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(body::full("500 Internal Server Error"))
        })
}

/// Map a resolver error onto its response
pub fn build_error_response(err: &ServeError) -> Response<ResponseBody> {
    match err {
        ServeError::NotFound | ServeError::Forbidden(_) => build_404_response(),
        ServeError::Io(e) => build_500_response(&e.to_string()),
    }
}

/// Build OPTIONS response (preflight request)
///
/// CORS headers are added later with every other response.
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(200)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(body::empty())
        })
}

/// Build redirect response with an empty body
pub fn build_redirect_response(target: &str, code: u16) -> Response<ResponseBody> {
    Response::builder()
        .status(code)
        .header("Location", target)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error(&code.to_string(), &e);
            Response::new(body::empty())
        })
}

/// Build generic HTML response
pub fn build_html_response(content: &'static str, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let payload = if is_head {
        body::empty()
    } else {
        body::full(Bytes::from_static(content.as_bytes()))
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(payload)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(body::empty())
        })
}

/// Log response build error
pub fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
