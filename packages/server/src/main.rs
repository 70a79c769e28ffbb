use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use faculty::config::AppConfig;
use faculty::state::AppState;
use faculty::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    if config.auth.jwt_secret.is_empty() {
        anyhow::bail!("auth.jwt_secret must be set (e.g. FACULTY__AUTH__JWT_SECRET)");
    }

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    seed::seed_groups(&db, &config.seed.groups).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = build_router(AppState { db, config });

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
