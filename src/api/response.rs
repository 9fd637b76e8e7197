// API response utility functions module

use crate::http::body::{self, ResponseBody};
use crate::logger;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build pretty-printed JSON response
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<ResponseBody> {
    let json = match serde_json::to_string_pretty(value) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body::full(json))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(body::full("Error"))
        })
}

/// JSON error body `{"error": message}`
pub fn error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    let payload = serde_json::json!({ "error": message });
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body::full(payload.to_string()))
        .unwrap_or_else(|_| Response::new(body::full("Error")))
}
