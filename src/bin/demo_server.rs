//! Demo backend binary
//!
//! Serves the in-memory `users` / `products` API on localhost so the
//! workbench has something to talk to:
//!
//! ```text
//! demo-server --port 3000
//! workbench send PUT http://localhost:3000/api/users/1 \
//!     -H 'Content-Type: application/json' --raw '{"name":"Johnny"}'
//! ```

use clap::Parser;
use rest_workbench::demo::{self, DemoState, ResourceStore};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(version, about = "In-memory CRUD backend for trying out requests")]
struct ServerArgs {
    /// Port to listen on
    #[arg(long, short, default_value_t = 3000)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// Delay applied to generic resource updates, in milliseconds
    #[arg(long = "latency-ms", default_value_t = 200)]
    latency_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = ServerArgs::parse();
    let addr = SocketAddr::new(args.host, args.port);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    let state = DemoState::new(
        ResourceStore::with_fixtures(),
        Duration::from_millis(args.latency_ms),
    );

    match demo::serve(listener, state, shutdown_signal()).await {
        Ok(()) => {
            log::info!("Demo server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Demo server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                log::warn!("Failed to install SIGTERM handler: {}", e);
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Received Ctrl+C");
                }
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl+C");
            }
            _ = sigterm.recv() => {
                log::info!("Received SIGTERM");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Received Ctrl+C");
        }
    }
}
