//! `jhm`: management commands for the catalogue database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::{Gazetteer, PleiadesGazetteer};
use tracing::{Level, info};

use server::config::AppConfig;
use server::database::init_db;
use server::importer::import_dataset;
use server::services::{catalogue, maintenance, users};

#[derive(Parser, Debug)]
#[command(name = "jhm")]
#[command(about = "Manage the inscription catalogue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a dataset workbook (.xlsx).
    Import {
        /// Path to the workbook.
        path: PathBuf,
    },
    /// Write places with records as a GeoJSON FeatureCollection.
    ExportGeojson {
        #[arg(long, default_value = "./features.geojson")]
        export_path: PathBuf,
    },
    /// Delete every place, record and vocabulary entry.
    Clear,
    /// Print a bearer token for an API user, creating the user if needed.
    Token {
        username: String,
    },
    /// Inspect the Pleiades gazetteer cache.
    Gazetteer {
        #[command(subcommand)]
        command: GazetteerCommand,
    },
}

#[derive(Subcommand, Debug)]
enum GazetteerCommand {
    /// Print the cached entry of a Pleiades id, building the cache if needed.
    Fetch { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Command::Import { path } => {
            let db = init_db(&config.database)
                .await
                .context("Failed to open database")?;
            let mut gazetteer =
                PleiadesGazetteer::new(&config.gazetteer).context("Failed to set up gazetteer")?;
            let report = import_dataset(&db, &mut gazetteer, &path, &config.import)
                .await
                .with_context(|| format!("Failed to import {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::ExportGeojson { export_path } => {
            let db = init_db(&config.database)
                .await
                .context("Failed to open database")?;
            let features = catalogue::export_geojson(&db, &export_path)
                .await
                .with_context(|| format!("Failed to export to {}", export_path.display()))?;
            info!(features, path = %export_path.display(), "Exported GeoJSON");
        }
        Command::Clear => {
            let db = init_db(&config.database)
                .await
                .context("Failed to open database")?;
            maintenance::clear_catalogue(&db)
                .await
                .context("Failed to clear catalogue")?;
        }
        Command::Token { username } => {
            let db = init_db(&config.database)
                .await
                .context("Failed to open database")?;
            let issued = users::issue_token(&db, &config.auth, &username).await?;
            if issued.created {
                info!(username = %issued.user.username, "Created user");
            }
            println!("{}", issued.token);
        }
        Command::Gazetteer {
            command: GazetteerCommand::Fetch { id },
        } => {
            let mut gazetteer =
                PleiadesGazetteer::new(&config.gazetteer).context("Failed to set up gazetteer")?;
            match gazetteer.fetch(id).await? {
                Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
                None => anyhow::bail!("Pleiades id {id} is not in the gazetteer"),
            }
        }
    }

    Ok(())
}
