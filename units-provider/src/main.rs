//! Units Provider Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio.
//!
//! Methods:
//! - initialize, ping: lifecycle
//! - getProviderSchema: provider metadata, data source schemas, function definitions
//! - validateDataSourceConfig: diagnostics for a data source configuration
//! - readDataSource: convert a configuration into state
//! - callFunction: call a provider function by name
//! - help: documentation for functions and data sources

mod server;

use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;
use server::{create_registry, handle_request, provider_version, RpcError, RpcRequest, RpcResponse};

/// Logs go to stderr; stdout carries the protocol
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn write_response(response: &RpcResponse) -> io::Result<()> {
    let json = serde_json::to_string(response).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()
}

fn main() {
    init_logging();

    let registry = create_registry();

    tracing::info!(
        version = %provider_version(),
        data_sources = registry.data_source_names().len(),
        functions = registry.function_names().len(),
        "units provider started"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                tracing::info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let request: RpcRequest = match serde_json::from_str(line) {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("error parsing request: {}", e);
                        if let Err(e) = write_response(&RpcResponse::error(None, RpcError::parse_error(e))) {
                            tracing::error!("error writing response: {}", e);
                            break;
                        }
                        continue;
                    }
                };

                tracing::debug!(method = %request.method, "processing");

                let response = handle_request(&registry, &request);

                // Notifications (no id) get no response
                if request.id.is_none() {
                    tracing::debug!(method = %request.method, "notification processed");
                    continue;
                }

                if let Err(e) = write_response(&response) {
                    tracing::error!("error writing response: {}", e);
                    break;
                }
            }
            Err(e) => {
                tracing::error!("error reading input: {}", e);
                break;
            }
        }
    }

    tracing::info!("server shutting down");
}
