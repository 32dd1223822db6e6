//! HTTP response building module
//!
//! Provides builders for JSON and HTML responses, decoupled from specific
//! handler logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

/// Serialize a payload and build a JSON response with the given status code.
///
/// Serialization failure degrades to a 500 with a fixed error body rather
/// than propagating.
pub fn json_payload<T: Serialize>(status: StatusCode, payload: &T) -> Response<Full<Bytes>> {
    match serde_json::to_string(payload) {
        Ok(body) => json(status, body),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            json(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error": "Internal server error"}"#.to_string(),
            )
        }
    }
}

/// Build a JSON response from an already-rendered body.
pub fn json(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("json", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 200 HTML response.
pub fn html(body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("html", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn log_build_error(kind: &str, err: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {kind} response: {err}"));
}
