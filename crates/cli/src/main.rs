//! EV Tracker CLI - resolve page progress from rendered HTML.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evtrack_core::{PageKind, Resolution, RingChart, SubJobId, WorkItem};
use evtrack_page::{ready_channel, EvTrackConfig, PageDocument, PageResolver, ProgressClient};
use evtrack_progress::{resolve_work_items, ColumnMap};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "evtrack")]
#[command(about = "Earned-value progress resolution for tracker pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the progress shown on a rendered page
    Resolve {
        /// Rendered page HTML; read from stdin when omitted
        #[arg(long)]
        html: Option<PathBuf>,
        /// Page kind: dashboard, project or sub-job
        #[arg(long)]
        page: PageKind,
        /// Fallback percentage, overriding the configured one
        #[arg(long)]
        default: Option<f64>,
        /// Sub job shown on the page
        #[arg(long)]
        sub_job: Option<String>,
        /// Print the ring chart input as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve progress from a JSON array of work items
    Items {
        /// Work items file
        file: PathBuf,
        /// Fallback percentage
        #[arg(long, default_value = "0")]
        default: f64,
    },
    /// Show the progress columns detected in each table
    Columns {
        /// Rendered page HTML
        #[arg(long)]
        html: PathBuf,
    },
    /// Inspect or edit the progress cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Ask the progress API for a sub job's percentage
    Fetch {
        /// Sub job ID
        sub_job: String,
        /// Percentage to use when the request fails
        #[arg(long, default_value = "0")]
        fallback: f64,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print a value
    Get {
        /// Key
        key: String,
    },
    /// Store a value
    Set {
        /// Key
        key: String,
        /// Value
        value: String,
    },
    /// Remove a value
    Remove {
        /// Key
        key: String,
    },
    /// List keys
    List {
        /// Only keys starting with this prefix
        #[arg(default_value = "")]
        prefix: String,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EvTrackConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EvTrackConfig::default(),
    };
    debug!(?config, "configuration");

    match cli.command {
        Commands::Resolve { html, page, default, sub_job, json } => {
            let mut defaults = config.defaults;
            if let Some(value) = default {
                match page {
                    PageKind::Dashboard => defaults.dashboard = value,
                    PageKind::ProjectOverview => defaults.project = value,
                    PageKind::SubJobOverview => defaults.sub_job = value,
                }
            }
            let sub_job = sub_job.as_deref().and_then(SubJobId::new);
            let pages = PageResolver::new(config.open_cache().await).with_defaults(defaults);

            let resolution = match html {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    pages.resolve(page, &text, sub_job.as_ref()).await
                }
                None => {
                    // The page arrives on stdin; give up after the ready timeout.
                    let (notifier, signal) = ready_channel();
                    std::thread::spawn(move || {
                        let mut text = String::new();
                        match std::io::stdin().read_to_string(&mut text) {
                            Ok(_) => {
                                notifier.deliver(text);
                            }
                            Err(e) => warn!(error = %e, "reading page from stdin failed"),
                        }
                    });
                    pages
                        .resolve_when_ready(page, signal, config.ready_timeout(), sub_job.as_ref())
                        .await
                }
            };
            print_resolution(resolution, json)?;
        }
        Commands::Items { file, default } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let items: Vec<WorkItem> = serde_json::from_str(&text)
                .with_context(|| format!("parsing work items in {}", file.display()))?;
            print_resolution(resolve_work_items(&items, None, default), false)?;
        }
        Commands::Columns { html } => {
            let text = std::fs::read_to_string(&html)
                .with_context(|| format!("reading {}", html.display()))?;
            let document = PageDocument::parse(&text);

            println!("Tables ({})", document.tables.len());
            for (i, table) in document.tables.iter().enumerate() {
                let columns = ColumnMap::from_headers(&table.headers);
                println!(
                    "  Table {} | {} rows | {}",
                    i + 1,
                    table.row_count(),
                    table.headers.join(", ")
                );
                println!("    budgeted quantity: {}", format_index(columns.budgeted_quantity));
                println!("    earned quantity:   {}", format_index(columns.earned_quantity));
                println!("    progress:          {}", format_index(columns.progress));
                println!("    budgeted hours:    {}", format_index(columns.budgeted_hours));
                println!("    earned hours:      {}", format_index(columns.earned_hours));
            }
            if let Some(progress) = document.cards.overall_progress() {
                println!("Overall Progress card: {}", progress);
            }
        }
        Commands::Cache { action } => {
            let cache = config.open_cache().await;
            match action {
                CacheAction::Get { key } => match cache.get(&key).await {
                    Some(value) => println!("{}", value),
                    None => println!("(not set)"),
                },
                CacheAction::Set { key, value } => {
                    cache.set(&key, &value).await;
                    println!("Set {}", key);
                }
                CacheAction::Remove { key } => {
                    cache.remove(&key).await;
                    println!("Removed {}", key);
                }
                CacheAction::List { prefix } => {
                    for key in cache.keys_with_prefix(&prefix).await {
                        println!("{}", key);
                    }
                }
            }
        }
        Commands::Fetch { sub_job, fallback } => {
            let id = SubJobId::new(&sub_job).context("empty sub job ID")?;
            let base = config
                .api_base
                .as_deref()
                .context("no api_base configured")?;
            let client = ProgressClient::new(base, config.fetch_timeout())?;
            print_resolution(client.fetch_or(&id, fallback).await, false)?;
        }
    }

    Ok(())
}

fn print_resolution(resolution: Resolution, json: bool) -> Result<()> {
    if json {
        let chart = RingChart::from_resolution(resolution);
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        println!("{} ({:.2}) via {}", resolution.label(), resolution.percent, resolution.source);
    }
    Ok(())
}

fn format_index(index: Option<usize>) -> String {
    match index {
        Some(i) => format!("column {}", i + 1),
        None => "-".to_string(),
    }
}
