#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! UMA resource server binary.
//!
//! Wires the resource server module to the static UMA plugin and serves the
//! share endpoints over HTTP.
//!
//! ```bash
//! uma-rs-server --config config/quickstart.yaml
//! RUST_LOG=resource_server=debug uma-rs-server --config config/quickstart.yaml
//! uma-rs-server --config config/quickstart.yaml --print-config
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::{HeaderName, Request};
use clap::Parser;
use resource_server::{Collaborators, ResourceServerModule};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, LoggingConfig};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Parser, Debug)]
#[command(name = "uma-rs-server", version, about = "UMA resource server", long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = AppConfig::load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        cfg.logging.level = level;
    }

    if args.print_config {
        print!("{}", cfg.to_yaml()?);
        return Ok(());
    }

    init_tracing(&cfg.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting uma-rs-server");

    let backend = Arc::new(static_uma_plugin::Service::from_config(&cfg.static_uma_plugin));
    info!(
        realm = %cfg.static_uma_plugin.realm,
        resources = cfg.static_uma_plugin.resources.len(),
        "Static UMA plugin loaded"
    );
    let module = ResourceServerModule::new(
        cfg.resource_server.clone(),
        Collaborators::from_single(&backend),
    );

    let app = with_http_layers(module.router());
    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    info!(addr = %cfg.server.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log filter '{}'", logging.level))?;

    let (json, text) = if logging.json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true),
            ),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()
        .context("failed to install tracing subscriber")
}

fn with_http_layers(router: Router) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<axum::body::Body>| {
                    let rid = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        request_id = %rid,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                ),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
