//! Route handler module
//!
//! Stateless handler functions, one per route. Each maps a request (or its
//! collected body) to a complete `Response` and never touches shared state.

use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::json;

use crate::response;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "rust-webservice";

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
struct TimePayload {
    time: String,
    timezone: &'static str,
}

static WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Rust Web Service</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        h1 { color: #CE412B; }
        .endpoint { background: #f5f5f5; padding: 10px; margin: 10px 0; border-left: 3px solid #CE412B; }
        code { background: #e8e8e8; padding: 2px 6px; border-radius: 3px; }
    </style>
</head>
<body>
    <h1>Rust Web Service</h1>
    <p>Welcome to the Rust web service running locally!</p>

    <h2>Available Endpoints:</h2>
    <div class="endpoint">
        <strong>GET /health</strong><br>
        Health check endpoint - returns service status
    </div>
    <div class="endpoint">
        <strong>GET /api/time</strong><br>
        Returns current server time in ISO 8601 format
    </div>
    <div class="endpoint">
        <strong>POST /api/echo</strong><br>
        Echoes back the JSON payload you send<br>
        Example: <code>{"message": "Hello, World!"}</code>
    </div>

    <h3>Try it out:</h3>
    <p>
        <code>curl http://localhost:8080/health</code><br>
        <code>curl http://localhost:8080/api/time</code><br>
        <code>curl -X POST http://localhost:8080/api/echo -H "Content-Type: application/json" -d '{"message":"Hello"}'</code>
    </p>
</body>
</html>
"#;

/// `GET /health` - fixed JSON status payload.
pub fn health() -> Response<Full<Bytes>> {
    response::json_payload(
        StatusCode::OK,
        &HealthPayload {
            status: "healthy",
            service: SERVICE_NAME,
        },
    )
}

/// `GET /` - static HTML welcome page listing the API routes.
pub fn root() -> Response<Full<Bytes>> {
    response::html(WELCOME_PAGE)
}

/// `GET /api/time` - current UTC time in ISO 8601 format.
pub fn time() -> Response<Full<Bytes>> {
    response::json_payload(
        StatusCode::OK,
        &TimePayload {
            time: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            timezone: "UTC",
        },
    )
}

/// `POST /api/echo` - wrap a valid JSON body under `received`.
///
/// An empty body and a body that does not parse as JSON are both rejected
/// with a 400 and a JSON error payload.
pub fn echo(body: &Bytes) -> Response<Full<Bytes>> {
    if body.is_empty() {
        return response::json(
            StatusCode::BAD_REQUEST,
            json!({"error": "Request body is empty"}).to_string(),
        );
    }

    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => response::json(
            StatusCode::OK,
            json!({
                "received": value,
                "timestamp": Utc::now().timestamp(),
            })
            .to_string(),
        ),
        Err(_) => response::json(
            StatusCode::BAD_REQUEST,
            json!({"error": "Request body is not valid JSON"}).to_string(),
        ),
    }
}

/// Fallback for any unmatched (method, path) pair.
pub fn not_found() -> Response<Full<Bytes>> {
    response::json(
        StatusCode::NOT_FOUND,
        json!({"error": "Not Found", "status": 404}).to_string(),
    )
}
