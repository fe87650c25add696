//! One-shot harvest: run every configured rule, publish, print the report.
//!
//! Run with: cargo run -p uidex-web --bin harvest

use tracing_subscriber::EnvFilter;
use uidex_web::config::Config;
use uidex_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let state = AppState::from_config(&config).await?;

    let report = state.harvester.run(&state.rules).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.sources_failed.is_empty() {
        eprintln!("{} of {} sources failed: {}", report.sources_failed.len(), report.sources.len(), report.sources_failed.join(", "));
    }
    Ok(())
}
