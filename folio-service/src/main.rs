mod error;
mod metrics;
mod routes;
mod state;

use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use folio_client::RemoteStore;
use folio_core::Config;
use state::{AppState, SharedState};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio-service")]
#[command(about = "Serve a markdown content store's index, navigation and pages as JSON")]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    bind: Option<String>,

    /// Base URL of the content store (overrides the config file)
    #[arg(long, env = "FOLIO_CONTENT_BASE")]
    base_url: Option<String>,

    /// Path to a folio.toml config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/status", get(routes::status))
        .route("/metrics", get(metrics::metrics))
        .route("/api/index", get(routes::index))
        .route("/api/documents", get(routes::documents))
        .route("/api/paths", get(routes::paths))
        .route("/api/children", get(routes::children_root))
        .route("/api/children/{*slug}", get(routes::children))
        .route("/api/nav", get(routes::nav))
        .route("/api/page", get(routes::page_root))
        .route("/api/page/{*slug}", get(routes::page))
        .route("/api/reload", post(routes::reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn run(args: Args) -> folio_core::Result<()> {
    let config = Config::load_or_default(args.config.as_deref())?;
    let base_url = args.base_url.unwrap_or(config.content.base_url.clone());
    let store = RemoteStore::new(&base_url)?;

    let state: SharedState = Arc::new(AppState::new(
        store,
        config.client.probe,
        config.ttl_duration()?,
    ));

    let bind = args.bind.unwrap_or(config.service.bind.clone());
    let port = args.port.unwrap_or(config.service.port);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, base_url = %base_url, "folio-service listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!(error = %e, "folio-service failed");
        std::process::exit(1);
    }
}
