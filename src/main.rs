mod config;
mod crawl;
mod error;
mod graph;
mod names;
mod numeric;
mod page;
mod qa;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use config::Settings;
use crawl::fetch::HttpFetcher;
use crawl::{CrawlOutput, Scheduler};
use graph::ntriples;
use graph::sparql::SparqlStore;

#[derive(Parser)]
#[command(name = "geo_qa", about = "Country knowledge graph crawler and question answering")]
struct Cli {
    /// Graph file to write or read (default: graph.nt, or GEO_QA_GRAPH_PATH)
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the country list and every linked country and leader page
    Create,
    /// Answer one question from the saved graph
    Question {
        /// e.g. "Who is the president of France?"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(path) = cli.graph {
        settings.graph_path = path;
    }

    match cli.command {
        Commands::Create => create(&settings).await,
        Commands::Question { text } => {
            let store = ntriples::load(&settings.graph_path).with_context(|| {
                format!(
                    "Failed to load {} (run 'create' first)",
                    settings.graph_path.display()
                )
            })?;
            let store = SparqlStore::from_triples(&store)?;
            debug!("Loaded {} triples into the query store", store.len()?);
            println!("{}", qa::answer(&store, &text.join(" "))?);
            Ok(())
        }
    }
}

async fn create(settings: &Settings) -> anyhow::Result<()> {
    let t0 = Instant::now();

    let fetcher = HttpFetcher::new(settings)?;
    let scheduler = Scheduler::seed(fetcher, settings).await?;
    debug!(
        "Scheduler {:?} with {} pages queued",
        scheduler.phase(),
        scheduler.state().frontier.pending()
    );
    let CrawlOutput { store, report } = scheduler.run().await;
    if store.is_empty() {
        warn!("Crawl produced no triples");
    }

    ntriples::save(&store, &settings.graph_path)
        .with_context(|| format!("Failed to write {}", settings.graph_path.display()))?;

    println!(
        "Visited {} pages ({} handled, {} fetch errors, {} handler errors), {} countries.",
        report.visited,
        report.handled,
        report.fetch_failures,
        report.handler_failures,
        report.countries,
    );
    println!(
        "Wrote {} triples to {}",
        report.triples,
        settings.graph_path.display()
    );
    println!("\nDone in {}", format_duration(t0.elapsed()));
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
