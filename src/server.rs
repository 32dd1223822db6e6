//! Server lifecycle module
//!
//! Wraps listener creation, the accept loop, and graceful start/stop around
//! the route dispatcher. One `Server` owns one listener; stopping is driven
//! by a cloneable [`ShutdownHandle`] so signal handlers never need a global
//! server instance.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

use crate::error::ServerError;
use crate::logger;
use crate::router;

/// HTTP server with a graceful start/stop lifecycle.
///
/// Owns the bind address and the shutdown signalling pair. The underlying
/// listener exists only while [`Server::start`] is pending; `start` blocks
/// the calling task until [`ShutdownHandle::stop`] is invoked or the bind
/// fails.
#[derive(Debug)]
pub struct Server {
    host: String,
    port: u16,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

/// Cloneable handle for stopping a running [`Server`] from another task,
/// typically a signal listener.
#[derive(Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl ShutdownHandle {
    /// Stop the server. No-op if it is not running.
    ///
    /// Uses `notify_one` so a stop issued between bind and the first accept
    /// is not lost.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        logger::log_stopping();
        self.shutdown.notify_one();
    }

    /// Whether the server is currently running. Safe to call from any task.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Server {
    /// Create a server bound-to-be on `host:port`.
    ///
    /// The port range check mirrors the CLI-side [`parse_port`]: `u16`
    /// already bounds the top end, so only 0 remains to reject here.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ServerError> {
        if port == 0 {
            return Err(ServerError::InvalidPort("0".to_string()));
        }
        Ok(Self {
            host: host.into(),
            port,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Handle for stopping this server from another task.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: Arc::clone(&self.running),
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// Bind the listener and serve until stopped.
    ///
    /// Returns `AlreadyRunning` without touching the listener if called
    /// twice. The `running` flag is set only after a confirmed successful
    /// bind, so `is_running()` never reports true for a server that failed
    /// to come up.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.running.load(Ordering::SeqCst) {
            logger::log_warning("Server is already running");
            return Err(ServerError::AlreadyRunning);
        }

        let listener = self.bind()?;

        // The flag must reflect a confirmed, usable bind; query the local
        // address first so no error path leaves it stuck true.
        let local_addr = listener.local_addr()?;
        self.running.store(true, Ordering::SeqCst);
        logger::log_listening(&local_addr);

        self.serve(listener).await;
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Stop the server. No-op if it is not running.
    pub fn stop(&self) {
        self.shutdown_handle().stop();
    }

    /// Accept loop: serve connections until the shutdown notification fires.
    ///
    /// Accept errors are transient (e.g. a connection reset before accept)
    /// and logged rather than aborting the loop.
    async fn serve(&self, listener: TcpListener) {
        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _peer_addr)) => serve_connection(stream),
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = self.shutdown.notified() => break,
            }
        }
    }

    fn bind(&self) -> Result<TcpListener, ServerError> {
        let authority = format!("{}:{}", self.host, self.port);
        let addr = authority
            .to_socket_addrs()
            .map_err(|_| ServerError::InvalidAddress(authority.clone()))?
            .next()
            .ok_or_else(|| ServerError::InvalidAddress(authority.clone()))?;

        create_listener(addr).map_err(|source| ServerError::Bind {
            addr: authority,
            source,
        })
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        // Dropping a running server stops it.
        if self.running.swap(false, Ordering::SeqCst) {
            self.shutdown.notify_one();
        }
    }
}

/// Serve a single connection on a spawned task.
fn serve_connection(stream: TcpStream) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let conn = http1::Builder::new()
            .serve_connection(io, service_fn(router::handle_request::<hyper::body::Incoming>));

        if let Err(err) = conn.await {
            logger::log_error(&format!("Failed to serve connection: {err:?}"));
        }
    });
}

/// Parse a CLI port argument, rejecting anything outside [1, 65535].
///
/// Parses through `i64` so out-of-range values like `-1` and `65536` report
/// the range error instead of a bare integer-parse failure.
pub fn parse_port(value: &str) -> Result<u16, ServerError> {
    let port = value
        .parse::<i64>()
        .map_err(|_| ServerError::InvalidPort(value.to_string()))?;

    u16::try_from(port)
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| ServerError::InvalidPort(value.to_string()))
}

/// Create a `TcpListener` with `SO_REUSEADDR` enabled.
///
/// Allows rebinding an address still in `TIME_WAIT` after a quick restart.
fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn wait_until_running(handle: &ShutdownHandle) {
        for _ in 0..100 {
            if handle.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("server did not reach the running state");
    }

    #[test]
    fn test_new_server_not_running() {
        let server = Server::new("localhost", 8081).unwrap();
        assert_eq!(server.host(), "localhost");
        assert_eq!(server.port(), 8081);
        assert!(!server.is_running());
    }

    #[test]
    fn test_new_rejects_port_zero() {
        let err = Server::new("localhost", 0).unwrap_err();
        assert!(matches!(err, ServerError::InvalidPort(_)));
    }

    #[test]
    fn test_parse_port_accepts_valid_range() {
        assert_eq!(parse_port("1").unwrap(), 1);
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port("65535").unwrap(), 65535);
    }

    #[test]
    fn test_parse_port_rejects_out_of_range() {
        for bad in ["0", "-1", "65536", "notaport", ""] {
            let err = parse_port(bad).unwrap_err();
            assert!(matches!(err, ServerError::InvalidPort(_)), "{bad}");
        }
    }

    #[test]
    fn test_move_transfers_state() {
        let server = Server::new("localhost", 8082).unwrap();
        let moved = server;
        assert_eq!(moved.host(), "localhost");
        assert_eq!(moved.port(), 8082);
        assert!(!moved.is_running());
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let server = Server::new("localhost", 8083).unwrap();
        server.stop();
        assert!(!server.is_running());

        let handle = server.shutdown_handle();
        handle.stop();
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_start_stop_round_trip() {
        let mut server = Server::new("127.0.0.1", 18431).unwrap();
        let handle = server.shutdown_handle();

        let task = tokio::spawn(async move { server.start().await });
        wait_until_running(&handle).await;

        handle.stop();
        let result = task.await.expect("join start task");
        assert!(result.is_ok());
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_start_reports_bind_failure() {
        // Occupy the port first so the server's bind must fail.
        let occupied = std::net::TcpListener::bind("127.0.0.1:18497").unwrap();

        let mut server = Server::new("127.0.0.1", 18497).unwrap();
        let err = server.start().await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(!server.is_running());

        drop(occupied);
    }

    #[tokio::test]
    async fn test_stop_still_works_after_early_noop_stop() {
        let mut server = Server::new("127.0.0.1", 18511).unwrap();
        let handle = server.shutdown_handle();

        // A stop arriving before the server is running is a no-op and must
        // not consume the ability to stop it later.
        handle.stop();
        assert!(!handle.is_running());

        let task = tokio::spawn(async move { server.start().await });
        wait_until_running(&handle).await;

        handle.stop();
        let result = task.await.expect("join start task");
        assert!(result.is_ok());
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_start_retry_after_bind_failure() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:18523").unwrap();

        let mut server = Server::new("127.0.0.1", 18523).unwrap();
        let err = server.start().await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(!server.is_running());

        // Once the port frees up, a retry must bind rather than report
        // AlreadyRunning from a stuck flag.
        drop(occupied);
        let handle = server.shutdown_handle();
        let task = tokio::spawn(async move { server.start().await });
        wait_until_running(&handle).await;

        handle.stop();
        assert!(task.await.expect("join start task").is_ok());
    }

    #[tokio::test]
    async fn test_serves_health_over_tcp() {
        let mut server = Server::new("127.0.0.1", 18473).unwrap();
        let handle = server.shutdown_handle();

        let task = tokio::spawn(async move { server.start().await });
        wait_until_running(&handle).await;

        let mut stream = TcpStream::connect("127.0.0.1:18473").await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("HTTP/1.1 200"));
        assert!(text.contains("healthy"));

        handle.stop();
        task.await.expect("join start task").expect("clean shutdown");
    }
}
