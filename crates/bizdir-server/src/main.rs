//! Business directory — process entry point.

mod config;

use std::sync::Arc;

use bizdir_auth::{SessionConfig, SessionStore};
use bizdir_core::error::DirectoryResult;
use bizdir_core::repository::KeyValueStore;
use bizdir_db::{DbManager, DurableMirror, FileStore, MemoryStore, SurrealStore};
use bizdir_directory::seed::seed_samples;
use bizdir_directory::{DirectoryConfig, DirectoryStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Backend, ServerConfig};

#[tokio::main]
async fn main() -> DirectoryResult<()> {
    dotenv::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bizdir=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    info!("Starting business directory...");

    let config = ServerConfig::from_env()?;
    match config.backend.clone() {
        Backend::Memory => run(MemoryStore::new(), &config).await?,
        Backend::File(path) => run(FileStore::open(path).await?, &config).await?,
        Backend::Surreal(db) => {
            let manager = DbManager::connect(&db).await?;
            run(SurrealStore::new(manager.client()), &config).await?
        }
    }

    info!("Business directory stopped.");
    Ok(())
}

async fn run<K: KeyValueStore>(store: K, config: &ServerConfig) -> DirectoryResult<()> {
    let mirror = Arc::new(DurableMirror::new(store));
    let session = Arc::new(
        SessionStore::open(
            mirror.clone(),
            SessionConfig {
                simulated_latency: config.simulated_latency,
                ..Default::default()
            },
        )
        .await?,
    );
    let directory = DirectoryStore::open(
        mirror,
        session.clone(),
        DirectoryConfig {
            simulated_latency: config.simulated_latency,
            ..Default::default()
        },
    )
    .await?;

    if let Some(owner) = config.seed_owner.clone() {
        seed_samples(&directory, owner).await?;
    }

    let visible = directory.list_visible().await?;
    let featured = directory.featured().await?;
    info!(
        signed_in = session.is_authenticated(),
        visible = visible.len(),
        categories = directory.categories().await?.len(),
        "Directory ready"
    );
    for listing in &featured {
        info!(listing_id = %listing.id, name = %listing.name, "Featured");
    }
    Ok(())
}
