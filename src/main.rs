use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use paper_explorer::cache::DatasetCache;
use paper_explorer::config::Settings;
use paper_explorer::state::{DashboardSnapshot, ExplorerState};

/// Explore research-paper metadata: filter by year, list top journals,
/// summarise abstracts.
#[derive(Parser)]
#[command(name = "paper-explorer", version, about, long_about = None)]
struct Cli {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Metadata file (.csv, .tsv, .json, .parquet)
    #[arg(long)]
    data: Option<PathBuf>,

    /// First year to include (defaults to the earliest in the data)
    #[arg(long = "from")]
    from_year: Option<i32>,

    /// Last year to include (defaults to the latest in the data)
    #[arg(long = "to")]
    to_year: Option<i32>,

    /// Number of journals to list
    #[arg(long = "top")]
    top_n: Option<usize>,

    /// Print the dashboard snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(data) = cli.data.clone() {
        settings.data_path = data;
    }

    let cache = DatasetCache::with_capacity(settings.cache_capacity)?;
    let dataset = cache
        .get_or_load(&settings.data_path)
        .context("loading paper metadata")?;

    let mut state = ExplorerState::new(dataset, settings)?;
    if let Some(n) = cli.top_n {
        state.set_top_n(n)?;
    }
    if cli.from_year.is_some() || cli.to_year.is_some() {
        state.set_open_year_range(cli.from_year, cli.to_year)?;
    }

    let snapshot = state.snapshot()?;
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?
        );
    } else {
        print_report(&snapshot);
    }
    Ok(())
}

fn print_report(snap: &DashboardSnapshot) {
    println!("Paper Explorer: {}", snap.source);
    match snap.year_range {
        Some(range) => println!(
            "Showing {} papers from {} to {}",
            snap.summary.paper_count,
            range.min(),
            range.max()
        ),
        None => println!("No papers with a usable title and publication year"),
    }

    println!("\nData overview");
    for row in &snap.overview {
        println!(
            "  {} | {} | {} | {}",
            row.year,
            row.journal,
            row.authors.as_deref().unwrap_or("-"),
            row.title
        );
    }

    println!("\nPublications by year");
    for entry in &snap.publications_by_year {
        println!("  {}  {}", entry.year, entry.count);
    }

    println!("\nTop {} journals", snap.top_n);
    for entry in &snap.top_journals {
        println!("  {:>6}  {}", entry.count, entry.journal);
    }

    println!("\nSummary statistics");
    println!(
        "  Average abstract length: {:.1} words",
        snap.summary.mean_abstract_word_count
    );
    println!("  Total papers: {}", snap.summary.paper_count);
    println!("  Total journals: {}", snap.summary.journal_count);

    let report = &snap.load_report;
    if report.rows_read != report.rows_retained {
        println!(
            "\n{} of {} rows dropped ({} without title, {} without a parseable date)",
            report.rows_read - report.rows_retained,
            report.rows_read,
            report.dropped_missing_title,
            report.dropped_missing_year
        );
    }
}
