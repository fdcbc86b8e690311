use anyhow::Context;
use common::PleiadesGazetteer;
use tracing::{Level, info};

use server::config::AppConfig;
use server::database::init_db;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    let gazetteer =
        PleiadesGazetteer::new(&config.gazetteer).context("Failed to set up gazetteer")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = server::build_router(AppState::new(db, config, gazetteer));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
