// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FORMA catalog maintenance tool.
//!
//! ```bash
//! # Load clothing items from a name,category,url CSV
//! forma-import catalog data.csv
//!
//! # Stage raw image URLs (newline or comma separated), skipping ones already stored
//! forma-import image-urls urls.txt
//!
//! # Write a JSON manifest of image URLs with blank attributes for tagging
//! forma-import image-manifest urls.txt images_updated.json
//!
//! # Check database connectivity
//! forma-import ping
//! ```
//!
//! Uses the same environment configuration as the API server.

use clap::{Parser, Subcommand};
use forma_api::{config::Config, db::Database, import};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "forma-import")]
#[command(author, version, about = "FORMA catalog import tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert clothing items from a CSV file
    Catalog {
        /// CSV with name, category and url columns
        path: PathBuf,
    },
    /// Insert image URLs from a text file, separated by newlines or commas
    ImageUrls {
        /// Text file of URLs
        path: PathBuf,
    },
    /// Write a tagging manifest for the URLs in a text file (no database access)
    ImageManifest {
        /// Text file with one URL per line
        input: PathBuf,
        /// JSON file to write
        #[arg(default_value = "images_updated.json")]
        output: PathBuf,
    },
    /// Connect to the database and report success
    Ping,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Manifest generation is file-to-file and needs no configuration.
    if let Commands::ImageManifest { input, output } = &cli.command {
        return write_image_manifest(input, output);
    }

    let config = Config::from_env()?;
    let db = Database::connect(&config).await?;

    match cli.command {
        Commands::Catalog { path } => import_catalog(&db, &path).await?,
        Commands::ImageUrls { path } => import_image_urls(&db, &path).await?,
        Commands::ImageManifest { .. } => {}
        Commands::Ping => {
            db.ping().await?;
            tracing::info!(project = %config.gcp_project_id, "Database connection successful");
        }
    }
    Ok(())
}

async fn import_catalog(db: &Database, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)?;
    let parsed = import::parse_catalog_csv(file)?;

    for err in &parsed.errors {
        tracing::warn!(line = err.line, message = %err.message, "Skipped row");
    }

    if parsed.items.is_empty() {
        tracing::info!("No items found in CSV to insert");
        return Ok(());
    }

    let inserted = db.insert_clothing_items(&parsed.items).await?;
    tracing::info!(
        inserted,
        skipped = parsed.errors.len(),
        "Catalog import complete"
    );
    Ok(())
}

async fn import_image_urls(
    db: &Database,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let urls = import::parse_url_list(&text);

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for url in &urls {
        if db.insert_image_url(url).await? {
            tracing::debug!(url = %url, "Inserted");
            inserted += 1;
        } else {
            tracing::debug!(url = %url, "Skipped duplicate");
            skipped += 1;
        }
    }

    tracing::info!(inserted, skipped, "Image URL import complete");
    Ok(())
}

fn write_image_manifest(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(input)?;
    let manifest = import::build_image_manifest(&text);

    std::fs::write(output, serde_json::to_string_pretty(&manifest)?)?;
    tracing::info!(
        count = manifest.len(),
        output = %output.display(),
        "Image manifest written"
    );
    Ok(())
}
