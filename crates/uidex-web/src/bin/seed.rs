//! Populate the catalog from the built-in seed matrix, no network needed.
//!
//! Run with: cargo run -p uidex-web --bin seed

use tracing::info;
use tracing_subscriber::EnvFilter;
use uidex_ingestion::seed::{default_seed_libraries, generate_seed, COMPONENT_SLUGS};
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

    let libraries = default_seed_libraries();
    let entries = generate_seed(&libraries, COMPONENT_SLUGS, state.harvester.normaliser());
    info!(libraries = libraries.len(), entries = entries.len(), "Seed matrix generated");

    let generation = state.harvester.publish_seed(entries).await?;
    let stats = state.db.stats().await?;
    println!("Seeded {} entries (generation {generation})", stats.catalog_entries);
    Ok(())
}
