//! Seeding binary: initializes the database and creates any groups defined
//! in `config.toml`, then logs an overview per seeded group.

use adashi::config;
use adashi::core::{group, overview};
use adashi::errors::Result;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Seed groups from config.toml, if present
    let seed_config = match config::groups::load_default_config() {
        Ok(seed_config) => seed_config,
        Err(e) => {
            warn!("No seed configuration loaded ({e}); nothing to do.");
            return Ok(());
        }
    };

    let created = group::seed_groups(&db, &seed_config.groups).await?;
    info!(created, "Seeding complete.");

    // 5. Log the state of every configured group
    for group_config in &seed_config.groups {
        if let Some(seeded) = group::get_group_by_name(&db, &group_config.name).await? {
            let snapshot = overview::generate_group_overview(&db, seeded.id).await?;
            info!("\n{}", overview::format_group_overview(&snapshot));
        }
    }

    Ok(())
}
