// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Dispatch to the subcommand handler
// 4. Print the report (table or JSON) on stdout
// 5. Exit with proper code (0 = all pages fetched, 1 = some pages failed,
//    2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod logging;
mod page;
mod scope;
mod snapshot;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands, CrawlArgs};
use config::CrawlConfig;
use crawl::{CrawlOutcome, Crawler, Frontier, LinkStatus};
use page::HttpFetcher;
use scope::SiteScope;
use snapshot::JsonFileSink;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished, every page fetched
//   Ok(1) = crawl finished, some pages could not be fetched
//   Err   = bad input or unreadable snapshot (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    match cli.command {
        Commands::Crawl(args) => handle_crawl(&args).await,
        Commands::Status { snapshot, json } => handle_status(JsonFileSink::new(snapshot), json),
    }
}

async fn handle_crawl(args: &CrawlArgs) -> Result<i32> {
    let scope = SiteScope::parse(args.scope.as_deref().unwrap_or(&args.seed_url))?;
    let seed = scope.admit_seed(&args.seed_url)?;
    let config = CrawlConfig::from(args);

    let sink = JsonFileSink::new(config.snapshot_path_for(&scope));
    let fetcher = HttpFetcher::new(&config).context("failed to build HTTP client")?;

    info!(seed = %seed, snapshot = %sink.path().display(), "crawl configured");

    let resumed = if args.resume {
        sink.load_if_present()
            .context("cannot resume from snapshot")?
    } else {
        None
    };

    let crawler = Crawler::new(fetcher, sink, scope, &config);
    let outcome = match resumed {
        Some(mut frontier) => {
            info!(
                entries = frontier.len(),
                unvisited = frontier.unvisited_count(),
                seed_status = ?frontier.status(&seed),
                "resuming from snapshot"
            );
            frontier.insert(seed);
            crawler.resume(frontier).await
        }
        None => crawler.run_crawl(&seed).await?,
    };

    print_frontier(&outcome.frontier, args.json)?;
    if !args.json {
        print_crawl_summary(&outcome);
    }

    if outcome.stats.fetch_failures > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn handle_status(sink: JsonFileSink, json: bool) -> Result<i32> {
    let frontier = sink.load()?;

    if json {
        print_frontier(&frontier, true)?;
    } else {
        println!("📄 Snapshot: {}", sink.path().display());
        if frontier.is_empty() {
            println!("⚠️  Snapshot has no entries");
        }
        print_counts(&frontier);
    }
    Ok(0)
}

// Prints the frontier either as a table or JSON
fn print_frontier(frontier: &Frontier, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(frontier)?);
    } else {
        print_table(frontier);
    }
    Ok(())
}

fn print_table(frontier: &Frontier) {
    println!("{:<80} {:<12}", "URL", "STATUS");
    println!("{}", "=".repeat(93));

    for (url, status) in frontier.iter() {
        // Truncate long URLs so the table stays aligned
        let url_display = if url.chars().count() > 77 {
            format!("{}...", url.chars().take(77).collect::<String>())
        } else {
            url.to_string()
        };
        println!("{:<80} {:<12}", url_display, format_status(status));
    }

    println!();
}

fn print_crawl_summary(outcome: &CrawlOutcome) {
    let stats = &outcome.stats;
    print_counts(&outcome.frontier);
    println!("   🔁 Passes: {}", stats.iterations);
    println!("   🌐 Pages fetched: {}", stats.pages_fetched);
    println!("   ❌ Fetch failures: {}", stats.fetch_failures);
    if stats.parse_failures > 0 {
        println!("   ⚠️  Parse failures: {}", stats.parse_failures);
    }
    if stats.persist_failures > 0 {
        println!("   💾 Snapshot write failures: {}", stats.persist_failures);
    }
}

fn print_counts(frontier: &Frontier) {
    println!("📊 Summary:");
    println!("   ✅ Checked: {}", frontier.visited_count());
    println!("   ⏳ Not-checked: {}", frontier.unvisited_count());
    println!("   📋 Total: {}", frontier.len());
}

fn format_status(status: LinkStatus) -> String {
    match status {
        LinkStatus::Visited => format!("✅ {}", status.as_str()),
        LinkStatus::Unvisited => format!("⏳ {}", status.as_str()),
    }
}
