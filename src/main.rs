mod cli;
mod metric_defs;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use axum::Router;
use clap::Parser;
use cli::LogFormat;
use colored::Colorize;
use lib::netutils::parse_addr;
use lib::service::{http_serve, ServiceContext};
use lib::{ApiConfig, ConfigLoader, MainConfig, Shutdown};
use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_util::MetricKindMask;
use proto::v1::projects_service_connect::{
    projects_service_handler,
    UnimplementedProjectsServiceHandler,
};
use proto::v1::stats_service_connect::{
    stats_service_handler,
    UnimplementedStatsServiceHandler,
};
use tokio::{select, time};
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};

const SERVICE_NAME: &str = "public-api";

fn setup_logging_subscriber(f: &LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_env_var("PUBLIC_API_LOG")
        .try_from_env()
        .unwrap_or_else(|_| {
            "info,public_apid=debug,lib=debug,connect=info,tower_http=info,\
             rpc_request_metadata=info"
                .into()
        });
    let stdout_layer = tracing_subscriber::fmt::layer().with_thread_names(true);
    let stdout_layer: Box<dyn Layer<_> + Send + Sync> = match f {
        | LogFormat::Pretty => stdout_layer.pretty().boxed(),
        | LogFormat::Compact => stdout_layer.compact().boxed(),
        | LogFormat::Json => stdout_layer.json().boxed(),
    };
    tracing_subscriber::registry()
        .with(stdout_layer.with_filter(env_filter))
        .init();
}

fn print_banner() {
    debug!("** {} **", "gitpod public api".magenta());
}

fn setup_prometheus(config: &MainConfig) -> Result<()> {
    let prometheus_sockaddr =
        parse_addr(&config.prometheus_address, config.prometheus_port)?;
    info!("Prometheus HTTP listener on {:?}", prometheus_sockaddr);
    PrometheusBuilder::new()
        .idle_timeout(
            MetricKindMask::HISTOGRAM,
            // Remove a metric from registry if it was not updated for 2
            // minutes.
            Some(Duration::from_secs(120)),
        )
        .with_http_listener(prometheus_sockaddr)
        .install()
        .context("Failed to install Prometheus recorder")
}

/// Mounts every service of the public API. Business logic lives elsewhere,
/// so each service answers with `unimplemented`.
fn api_router(config: &ApiConfig) -> Router {
    let (projects_prefix, projects) = projects_service_handler(
        UnimplementedProjectsServiceHandler,
        config.handler_options(),
    );
    let (stats_prefix, stats) = stats_service_handler(
        UnimplementedStatsServiceHandler,
        config.handler_options(),
    );
    debug!(prefix = projects_prefix, "Mounted service");
    debug!(prefix = stats_prefix, "Mounted service");

    Router::new().merge(projects).merge(stats)
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists
    match dotenvy::dotenv() {
        | Ok(_) => {}
        // .env files are optional
        | Err(e) if e.not_found() => {}
        | Err(e) => bail!("Failed to load .env file: {e}"),
    };

    let opts = cli::CliOpts::parse();
    setup_logging_subscriber(&opts.log_format);
    print_banner();

    trace!(config = opts.config, "Loading configuration");
    let config_loader = Arc::new(ConfigLoader::from_path(&opts.config));
    let config = config_loader
        .load()
        .context("Failed to load configuration")?;

    setup_prometheus(&config.main)?;
    metric_defs::install_metrics();

    let mut shutdown = Shutdown::default();
    let addr = parse_addr(&config.api.address, config.api.port)?;
    let router = api_router(&config.api);
    let mut context = ServiceContext::new(
        SERVICE_NAME.to_owned(),
        config_loader.clone(),
        shutdown.clone(),
    );
    let mut server = tokio::spawn(async move {
        http_serve(&mut context, addr, router).await
    });

    // Waiting for <C-c> to terminate
    select! {
        res = &mut server => {
            // The server only returns on its own when it failed.
            return res.context("Server task panicked")?;
        },
        _ = shutdown.recv() => {
            warn!("Received shutdown signal from the server!");
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Received Ctrl+c signal (SIGINT)!");
            shutdown.broadcast_shutdown();
        }
    };

    let timeout = Duration::from_secs(config.api.shutdown_timeout_s);
    info!("Waiting ({timeout:?}) for the server to shutdown cleanly...");
    match time::timeout(timeout, &mut server).await {
        | Ok(res) => res.context("Server task panicked")??,
        | Err(_) => {
            error!("Timed out awaiting the server to shutdown!");
            server.abort();
            bail!("The server was not terminated cleanly!");
        }
    }
    info!("Bye!");
    Ok(())
}
