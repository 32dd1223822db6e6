//! Logger module
//!
//! Console logging utilities for the web service:
//! - Startup banner and lifecycle messages
//! - Per-request access lines
//! - Error and warning messages

use hyper::Method;

/// Print the startup banner before the server begins listening.
pub fn log_startup(host: &str, port: u16) {
    println!("======================================");
    println!("  Rust Web Service");
    println!("======================================");
    println!("Server will start on: http://{host}:{port}");
    println!("Press Ctrl+C to stop");
    println!("======================================");
}

/// Log one access line per handled request, e.g. `[GET] /health -> 200`.
pub fn log_request(method: &Method, path: &str, status: u16) {
    println!("[{method}] {path} -> {status}");
}

pub fn log_listening(addr: &std::net::SocketAddr) {
    println!("Listening on: http://{addr}");
}

pub fn log_signal(name: &str) {
    println!("\n[SIGNAL] {name} received, stopping server...");
}

pub fn log_stopping() {
    println!("Stopping server...");
}

pub fn log_stopped() {
    println!("Server stopped");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}
