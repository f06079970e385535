use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use config::ConfigError;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::{Config, ConfigLoader};
use crate::logging::RpcMakeSpan;
use crate::rpc_middleware::TelemetryMiddleware;
use crate::shutdown::Shutdown;

#[derive(Clone)]
pub struct ServiceContext {
    name: String,
    config_loader: Arc<ConfigLoader>,
    shutdown: Shutdown,
}

impl ServiceContext {
    pub fn new(
        name: String,
        config_loader: Arc<ConfigLoader>,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            name,
            config_loader,
            shutdown,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.name
    }

    pub fn load_config(&self) -> Result<Config, ConfigError> {
        self.config_loader.load()
    }

    /// Awaits the shutdown signal
    pub async fn recv_shutdown_signal(&mut self) {
        self.shutdown.recv().await
    }

    /// Causes all listeners to start the shutdown sequence.
    pub fn broadcast_shutdown(&mut self) {
        self.shutdown.broadcast_shutdown()
    }
}

/// Adds request tracing to every request and RPC metrics to requests that
/// matched a mounted procedure. Unmatched paths never become metric labels.
pub(crate) fn instrument(router: Router, service_name: &str) -> Router {
    router
        .route_layer(TelemetryMiddleware::new(service_name))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(RpcMakeSpan::new(service_name)),
        )
}

/// Binds `addr` and serves `router` until the shutdown signal.
pub async fn http_serve(
    context: &mut ServiceContext,
    addr: SocketAddr,
    router: Router,
) -> Result<()> {
    let listener = TcpListener::bind(addr).with_context(|| {
        format!("Failed to bind '{}' to {addr}", context.service_name())
    })?;
    serve_listener(context, listener, router).await
}

/// Serves `router` on an already bound listener with request tracing and
/// RPC metrics. In-flight requests are drained once the shutdown signal is
/// received. A server failure broadcasts shutdown to the rest of the
/// process.
#[tracing::instrument(skip_all, fields(service = context.service_name()))]
pub async fn serve_listener(
    context: &mut ServiceContext,
    listener: TcpListener,
    router: Router,
) -> Result<()> {
    let app = instrument(router, context.service_name());

    let addr = listener.local_addr()?;
    info!("Starting '{}' on {:?}", context.service_name(), addr);
    let mut shutdown = context.clone();
    let server = axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown.recv_shutdown_signal().await
        });

    if let Err(e) = server.await {
        error!(
            "Service '{}' failed and will trigger system shutdown: {e}",
            context.service_name()
        );
        context.broadcast_shutdown();
        return Err(e.into());
    }
    info!("Service '{}' terminated", context.service_name());
    Ok(())
}
