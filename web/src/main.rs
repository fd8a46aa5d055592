use anyhow::Result;
use axum::Router;
use clap::Parser;
use state::{AppState, SharedState};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

mod api;
mod config;
mod error;
mod map;
mod state;

const LOCATION_PREFIX: &str = "/locations";

/// Builds the absolute URL of the show-map page for the host that made the
/// current request
pub(crate) fn show_map_url(scheme: &str, host: &str) -> String {
    format!("{scheme}://{host}{LOCATION_PREFIX}/show-map/")
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(short, long, default_value = "locweb.yaml")]
    pub config: PathBuf,
    #[arg(short, long, default_value = "dev")]
    pub env: String,
}

fn app(state: AppState) -> Router {
    // the api routes carry the full prefix themselves; nesting would leave
    // the collection at "/", which does not match "/locations/"
    Router::new()
        .merge(api::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("LOCWEB_LOG"))
        .init();
    let args = Cli::parse();
    let config = config::EnvConfig::load(&args.config, &args.env)?;
    debug!("using database '{}'", config.database);

    let addr: SocketAddr = format!("{}:{}", config.listen.host, config.listen.port).parse()?;
    let shared_state = Arc::new(SharedState::new(config).await?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app(shared_state)).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_app(pool: sqlx::Pool<sqlx::Sqlite>) -> (Router, AppState) {
    let state = Arc::new(SharedState::test(pool));
    (app(state.clone()), state)
}
