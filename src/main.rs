//! Sages CLI
//!
//! Command-line interface for the sages dataset indexer:
//! - Print the derived index
//! - Validate a dataset
//! - Compute the period × group cell grid
//! - Normalize cell labels
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use sages::config::{generate_default_config, Config, LoggingConfig};
use sages::dataset::{load_source, DataSource, Dataset};
use sages::index::{DatasetIndexer, Index, PeriodOrdering, UnresolvedPolicy};
use sages::layout::Grid;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Index historical period and sage datasets for chronology charts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Period ordering (declared, chronological)
    #[arg(long, global = true)]
    pub ordering: Option<PeriodOrdering>,

    /// Handling of sages with unknown periods (reject, quarantine, tolerate)
    #[arg(long, global = true)]
    pub unresolved: Option<UnresolvedPolicy>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the index of a dataset
    Index {
        /// Dataset file path or http(s) URL
        source: String,
    },

    /// Check a dataset and report every problem
    Validate {
        /// Dataset file path or http(s) URL
        source: String,
    },

    /// Print the period × group cell grid
    Grid {
        /// Dataset file path or http(s) URL
        source: String,
    },

    /// Normalize a cell label
    Label {
        /// Period id
        period: String,
        /// Group id
        group: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config loading logs through a bootstrap subscriber until the configured one is installed
    let mut config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        match &cli.config {
            Some(path) => Config::load_with_env(path),
            None => Ok(Config::load_default()),
        }
    })?;
    if let Some(ordering) = cli.ordering {
        config.index.period_ordering = ordering;
    }
    if let Some(policy) = cli.unresolved {
        config.index.unresolved = policy;
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Index { source } => {
            let dataset = load(&source, &config).await?;
            let index = DatasetIndexer::new(config.indexer_config()).index(&dataset)?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&index)?),
                _ => print_index(&index, &config),
            }
        }

        Commands::Validate { source } => {
            let dataset = load(&source, &config).await?;

            let drift = dataset.out_of_range_sages();
            for sage in &drift {
                tracing::warn!(
                    sage = %sage.name,
                    period = %sage.period_id,
                    year = sage.year,
                    "Sage year outside its period"
                );
            }

            match DatasetIndexer::new(config.indexer_config()).index(&dataset) {
                Ok(index) => {
                    println!("OK: {}", index.stats());
                    for sage in &index.unresolved {
                        println!(
                            "  unresolved: '{}' references unknown period '{}'",
                            sage.name, sage.period_id
                        );
                    }
                    if !drift.is_empty() {
                        println!("  {} sage(s) dated outside their period", drift.len());
                    }
                }
                Err(e) => {
                    eprintln!("Dataset is invalid:");
                    for issue in e.issues() {
                        eprintln!("  - {}", issue);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Grid { source } => {
            let dataset = load(&source, &config).await?;
            let index = DatasetIndexer::new(config.indexer_config()).index(&dataset)?;
            let grid = Grid::build(&index, &config.labels, &config.layout);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&grid)?),
                "csv" => print_grid_csv(&grid)?,
                _ => print_grid_table(&grid),
            }
        }

        Commands::Label { period, group } => {
            println!("{}", config.labels.normalize(&period, &group));
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                println!("{}", content);
            }
        }
    }

    Ok(())
}

fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sages=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("sages={}", logging.level)));

    // Logs go to stderr so stdout stays clean for json/csv output
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn load(source: &str, config: &Config) -> anyhow::Result<Dataset> {
    let source = DataSource::parse(source);
    load_source(&source, &config.loader_config())
        .await
        .with_context(|| format!("Failed to load dataset from {}", source))
}

fn print_index(index: &Index, config: &Config) {
    let range = index.year_range_or(config.index.default_range);

    println!("Years: {}", range);
    println!("Groups: {}", index.group_keys.join(", "));
    println!();
    println!("{:<24} {:<30} {:<10} {}", "Period", "Name", "Sages", "Groups");
    println!("{}", "-".repeat(80));

    for period_id in &index.ordered_periods {
        let groups = index.grouping.get(period_id);
        let sages: usize = groups
            .map(|g| g.values().map(|s| s.len()).sum())
            .unwrap_or(0);
        let group_list = groups
            .map(|g| g.keys().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();

        println!(
            "{:<24} {:<30} {:<10} {}",
            period_id,
            index.period_name(period_id),
            sages,
            group_list
        );
    }

    if !index.unresolved.is_empty() {
        println!();
        println!("Unresolved:");
        for sage in &index.unresolved {
            println!("  {} -> {}", sage.name, sage.period_id);
        }
    }
}

fn print_grid_table(grid: &Grid) {
    println!(
        "{:<24} {:<20} {:>8} {:>8} {}",
        "Period", "Label", "X", "Y", "Sages"
    );
    println!("{}", "-".repeat(80));

    for cell in &grid.cells {
        let names: Vec<&str> = cell.lines.iter().map(|l| l.name.as_str()).collect();
        println!(
            "{:<24} {:<20} {:>8.1} {:>8.1} {}",
            cell.period_id,
            cell.label,
            cell.x,
            cell.y,
            names.join(", ")
        );
    }
}

fn print_grid_csv(grid: &Grid) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record([
        "period_id",
        "group_id",
        "label",
        "x",
        "y",
        "width",
        "height",
        "line_height",
        "sages",
    ])?;

    for cell in &grid.cells {
        let names: Vec<&str> = cell.lines.iter().map(|l| l.name.as_str()).collect();
        writer.write_record([
            cell.period_id.clone(),
            cell.group_id.clone(),
            cell.label.clone(),
            format!("{:.2}", cell.x),
            format!("{:.2}", cell.y),
            format!("{:.2}", cell.width),
            format!("{:.2}", cell.height),
            format!("{:.2}", cell.line_height),
            names.join("; "),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
