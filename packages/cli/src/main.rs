#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front-end for the restaurant safety catalog.
//!
//! Drives a [`safebite_session::SessionState`] against the hosted table:
//! search by name substring, browse the top-10 safest/most-dangerous
//! rankings, and open a restaurant's info display with its incident
//! narrative. A `--query` flag runs a single search non-interactively.

mod interactive;

use clap::Parser;
use safebite_catalog::table::{CatalogConfig, TableCatalog};

/// Search restaurants by name and rank them by nearby-crime danger.
#[derive(Parser)]
#[command(name = "safebite")]
#[command(about = "Search and rank restaurants by nearby-crime danger score")]
struct Cli {
    /// Query endpoint URL (defaults to `SAFEBITE_API_URL`).
    #[arg(long)]
    api_url: Option<String>,

    /// API key for the hosted table (defaults to `SAFEBITE_API_KEY`).
    #[arg(long)]
    api_key: Option<String>,

    /// Restaurant table identifier (defaults to `SAFEBITE_TABLE`).
    #[arg(long)]
    table: Option<String>,

    /// Run one search and print the rankings instead of the
    /// interactive loop.
    #[arg(long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let mut config = CatalogConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.base_url = api_url;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }
    if let Some(table) = cli.table {
        config.table_id = table;
    }

    let catalog = TableCatalog::new(config);

    if let Some(query) = cli.query {
        interactive::run_once(&catalog, &query).await
    } else {
        interactive::run(&catalog).await
    }
}
