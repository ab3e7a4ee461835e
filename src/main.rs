use analyzer::ProfitPotentialOrchestrator;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::Settings;
use core_types::normalize_ticker;
use database::DbRepository;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use web_server::AppState;

mod import;
mod render;

/// The main entry point for the Tickerscope application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_config(&cli.config)?;
    let _log_guard = configuration::logging::init(&settings.logging)?;

    // Initialize the database connection and run migrations
    let db_pool = database::connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    database::run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    let db_repo = DbRepository::new(db_pool);

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, db_repo, &settings).await,
        Commands::Import(args) => handle_import(args, db_repo, &settings).await,
        Commands::Serve(args) => handle_serve(args, db_repo, &settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Historical profit-potential analysis for stock tickers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML settings file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a ticker over a date window, its neighbouring periods and its peers.
    Analyze(AnalyzeArgs),
    /// Load daily OHLCV rows from a CSV file into the database.
    Import(ImportArgs),
    /// Run the HTTP API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The ticker to analyze (e.g., "AAPL").
    #[arg(long)]
    ticker: String,

    /// First day of the window (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the window, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ImportArgs {
    /// CSV file with columns ticker,date,open,high,low,close,adj_close,volume.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address; defaults to the configured server host and port.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_analyze(
    args: AnalyzeArgs,
    db_repo: DbRepository,
    settings: &Settings,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.from <= args.to,
        "--from ({}) must not be after --to ({})",
        args.from,
        args.to
    );
    let ticker = normalize_ticker(&args.ticker);

    let orchestrator = ProfitPotentialOrchestrator::new(db_repo, settings.analysis.clone());
    let report = orchestrator
        .analyze_profit_potential(&ticker, args.from, args.to)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::report_tables(&ticker, &report));
    }
    Ok(())
}

async fn handle_import(
    args: ImportArgs,
    db_repo: DbRepository,
    settings: &Settings,
) -> anyhow::Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("Cannot open {}", args.file.display()))?;
    let bars = import::read_bars(file)?;
    tracing::info!(rows = bars.len(), file = %args.file.display(), "Importing price history.");

    let progress_bar = ProgressBar::new(bars.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let concurrency = settings.database.max_connections as usize;
    let summary = import::import_bars(&db_repo, &bars, concurrency, &progress_bar).await?;
    progress_bar.finish_with_message("Import complete!");

    println!(
        "Imported {} new rows, skipped {} already stored.",
        summary.inserted, summary.skipped
    );
    Ok(())
}

async fn handle_serve(
    args: ServeArgs,
    db_repo: DbRepository,
    settings: &Settings,
) -> anyhow::Result<()> {
    let addr = match args.addr {
        Some(addr) => addr,
        None => settings.server.socket_addr()?,
    };
    let state = AppState::new(db_repo, settings.analysis.clone());
    web_server::run_server(addr, state).await
}
