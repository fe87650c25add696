//! uidex Web Server
//!
//! Run with: cargo run -p uidex-web

use tracing::info;
use tracing_subscriber::EnvFilter;
use uidex_web::config::Config;
use uidex_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting uidex web server...");

    let config = Config::load()?;
    let state = AppState::from_config(&config).await?;
    if state.admin_token.is_none() {
        info!("No admin token configured; admin routes are open");
    }

    let app = uidex_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
