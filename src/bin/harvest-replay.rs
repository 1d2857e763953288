//! # Harvest Replay
//!
//! Runs poll cycles against a JSON corpus file (an array of search result
//! objects, each with a numeric `id`) using the configured PostgreSQL
//! checkpoint table and PGMQ queue. Useful for exercising a deployment end
//! to end without the live search provider.

use clap::Parser;
use search_harvester::config::ConfigLoader;
use search_harvester::logging::init_logging;
use search_harvester::models::Item;
use search_harvester::search::InMemorySearchSource;
use search_harvester::{HarvesterConfig, HarvesterSystem};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "harvest-replay")]
#[command(about = "Replay a JSON corpus through the harvester")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// JSON file containing an array of items
    #[arg(short, long)]
    items: PathBuf,

    /// Configuration file (defaults to HARVESTER_CONFIG_PATH or config/harvester.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Items served per search page (defaults to search.page_limit)
    #[arg(long)]
    page_limit: Option<usize>,

    /// Number of poll cycles to run
    #[arg(long, default_value_t = 1)]
    cycles: usize,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Harvest replay failed");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let loader = match cli.config {
        Some(path) => ConfigLoader::default().with_file(path, true),
        None => ConfigLoader::from_process_env(),
    };
    let config = loader.load()?;

    let corpus = std::fs::read_to_string(&cli.items)?;
    let items: Vec<Item> = serde_json::from_str(&corpus)?;
    info!(items = items.len(), path = %cli.items.display(), "Loaded replay corpus");

    let source = Arc::new(replay_source(items, cli.page_limit, &config));
    let system = HarvesterSystem::bootstrap(config, source).await?;

    for cycle in 1..=cli.cycles {
        let summary = system.run_once().await?;
        info!(cycle, "Replay cycle finished");
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    system.shutdown().await;
    Ok(())
}

/// Corpus source paged by the CLI override or the configured page limit
fn replay_source(
    items: Vec<Item>,
    page_limit: Option<usize>,
    config: &HarvesterConfig,
) -> InMemorySearchSource {
    let page_limit = page_limit.unwrap_or(config.search.page_limit);
    InMemorySearchSource::with_page_limit(items, page_limit)
}
