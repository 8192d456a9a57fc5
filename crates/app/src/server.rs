//! HTTP server
//!
//! Connections are served by hyper directly so the request head can be
//! bounded in size and in read time, which `axum::serve` does not expose.

use std::future::Future;
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use dialog_common::config::Config;

/// Time in-flight connections get to finish once shutdown starts
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Limits applied to every HTTP/1 connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerLimits {
    /// Requests whose head outgrows this many bytes get a 431
    pub header_max_size: usize,
    pub read_header_timeout: Duration,
}

impl From<&Config> for ServerLimits {
    fn from(config: &Config) -> Self {
        Self {
            header_max_size: config.request_header_max_size,
            read_header_timeout: config.read_header_timeout(),
        }
    }
}

/// Accept connections until `shutdown` resolves, then give open connections
/// up to [`SHUTDOWN_TIMEOUT`] to finish.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    limits: ServerLimits,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let mut builder = Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(limits.read_header_timeout)
        .max_buf_size(limits.header_max_size);

    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(connection) => connection,
                    Err(err) => {
                        warn!(error = %err, "Failed to accept connection");
                        continue;
                    }
                };

                let service = TowerToHyperService::new(app.clone());
                let connection = builder
                    .serve_connection_with_upgrades(TokioIo::new(stream), service)
                    .into_owned();
                let connection = graceful.watch(connection);

                tokio::spawn(async move {
                    if let Err(err) = connection.await {
                        debug!(peer = %peer, error = %err, "Connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => break,
        }
    }

    drop(listener);

    tokio::select! {
        _ = graceful.shutdown() => info!("All connections closed"),
        _ = tokio::time::sleep(SHUTDOWN_TIMEOUT) => {
            warn!(timeout_secs = SHUTDOWN_TIMEOUT.as_secs(), "Connections still open after shutdown timeout");
        }
    }

    Ok(())
}
