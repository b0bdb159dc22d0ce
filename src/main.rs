use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use edusite_gateway::api::{self, AppState};
use edusite_gateway::config::{self, Config};
use edusite_gateway::resources::FetchContext;
use edusite_gateway::strapi::StrapiClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config)).context("failed to load configuration")?;

    let client = StrapiClient::from_config(&cfg).context("failed to build Strapi client")?;
    info!(strapi = %client.base_url(), environment = %cfg.server.environment, "strapi client ready");
    let ctx = FetchContext::from_config(Arc::new(client), &cfg);
    let state = Arc::new(AppState::new(ctx, &cfg));

    let app = api::build_router(state)
        .layer(build_cors(&cfg))
        .layer(TraceLayer::new_for_http());

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("gateway stopped");
    Ok(())
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if cfg.server.cors_origins.is_empty() {
        if cfg.is_production() {
            warn!("no CORS origins configured; allowing any origin");
        }
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = cfg
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
