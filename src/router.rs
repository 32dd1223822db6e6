//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: matches `(method, path)` against
//! the static route table and dispatches to the handler functions. Generic
//! over the request body type so tests can drive it with in-memory bodies
//! while the server drives it with `hyper::body::Incoming`.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;

use crate::handlers;
use crate::logger;
use crate::response;

/// Main entry point for HTTP request handling.
pub async fn handle_request<B: Body>(req: Request<B>) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = match (&method, path.as_str()) {
        (&Method::GET, "/health") => handlers::health(),
        (&Method::GET, "/") => handlers::root(),
        (&Method::GET, "/api/time") => handlers::time(),
        (&Method::POST, "/api/echo") => echo_collected(req).await,
        _ => handlers::not_found(),
    };

    logger::log_request(&method, &path, resp.status().as_u16());
    Ok(resp)
}

/// Collect the request body and hand it to the echo handler.
async fn echo_collected<B: Body>(req: Request<B>) -> Response<Full<Bytes>> {
    match req.into_body().collect().await {
        Ok(collected) => handlers::echo(&collected.to_bytes()),
        Err(_) => response::json(
            StatusCode::BAD_REQUEST,
            json!({"error": "Failed to read request body"}).to_string(),
        ),
    }
}
