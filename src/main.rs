//! Process entry point
//!
//! Usage: `webservice [port] [host]` - both positional, defaulting to
//! 8080/localhost. Exits 0 on clean shutdown, 1 on startup failure.

use std::process::ExitCode;

mod error;
mod handlers;
mod logger;
mod response;
mod router;
mod server;
mod signal;

use error::ServerError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "localhost";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (port, host) = parse_args(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(host, port))
}

async fn async_main(host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    logger::log_startup(&host, port);

    let mut server = server::Server::new(host, port)?;

    // The signal listener holds a shutdown handle instead of reaching for a
    // global server instance.
    signal::spawn_signal_listener(server.shutdown_handle());

    server.start().await?;
    logger::log_stopped();
    Ok(())
}

/// Parse `[port] [host]` positional arguments.
fn parse_args(args: &[String]) -> Result<(u16, String), ServerError> {
    let port = match args.first() {
        Some(raw) => server::parse_port(raw)?,
        None => DEFAULT_PORT,
    };

    let host = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    Ok((port, host))
}
