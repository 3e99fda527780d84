//! Command-line interface: the thin presentation layer over the core.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::adapter::sqlite::export::{export_all_csv, export_product_csv, write_export};
use crate::adapter::sqlite::{create_pool, run_migrations};
use crate::adapter::SqliteHistoryStore;
use crate::app::App;
use crate::config::Config;
use crate::domain::ProductId;
use crate::port::HistoryStore;

#[derive(Parser)]
#[command(name = "cardwatch", version, about = "Marketplace price tracking and alerting")]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the polling scheduler and alert pipeline.
    Run,
    /// Print recorded price history for a product.
    History {
        /// Marketplace product id.
        product_id: String,
    },
    /// Write a CSV export of recorded history.
    Export {
        /// Limit the export to one product.
        #[arg(long)]
        product: Option<String>,
        /// Write to this file instead of the exports directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Dispatch a parsed invocation.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Command::Run => {
            config.init_logging();
            App::run(config).await?;
        }
        Command::History { product_id } => {
            let store = open_store(&config)?;
            let product = ProductId::from(product_id);
            let entries = store
                .history(&product)
                .await
                .with_context(|| format!("reading history for {product}"))?;

            let Some(latest) = entries.last() else {
                println!("No recorded history for {product}");
                return Ok(());
            };

            println!(
                "{product}: {} entries, latest {} {} at {}",
                entries.len(),
                latest.price(),
                latest.currency(),
                latest.observed_at().to_rfc3339(),
            );
            for entry in &entries {
                println!(
                    "{}  {} {}  {}/{}  x{}  {}",
                    entry.observed_at().to_rfc3339(),
                    entry.price(),
                    entry.currency(),
                    entry.language(),
                    entry.condition(),
                    entry.quantity(),
                    entry.listing_id().map(|l| l.as_str()).unwrap_or("-"),
                );
            }
        }
        Command::Export { product, out } => {
            let store = open_store(&config)?;
            let product = product.map(ProductId::from);

            match out {
                Some(path) => {
                    let csv = match &product {
                        Some(product) => export_product_csv(&store, product).await?,
                        None => export_all_csv(&store).await?,
                    };
                    std::fs::write(&path, csv)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => {
                    let path =
                        write_export(&store, product.as_ref(), &config.storage.exports_dir())
                            .await?;
                    println!("Exported to {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<SqliteHistoryStore> {
    config.storage.ensure_directories()?;
    let pool = create_pool(&config.storage.database_url()).context("opening history database")?;
    run_migrations(&pool).context("running migrations")?;
    Ok(SqliteHistoryStore::new(pool))
}
