//! Chemseed CLI - rebuilds the chemistry lab knowledge base database

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use chemseed::config::{self, SeedConfig};
use chemseed::ui::{self, Icons};
use chemseed::{seed_database, Dataset, MissPolicy, SeedStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "chemseed")]
#[command(version)]
#[command(about = "Seeds the chemistry lab knowledge base into SQLite")]
#[command(long_about = r#"
Chemseed deletes any existing lab database and rebuilds it from the
knowledge base: substances, reactions, and the stoichiometric links
between them.

Example usage:
  chemseed
  chemseed seed --database lab/chemistry.db --on-missing warn
  chemseed stats --database chemistry.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./chemseed.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the database (the default when no command is given)
    Seed {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Load this dataset file instead of the built-in knowledge base
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// What to do with reaction formulas that match no substance (skip, warn, fail)
        #[arg(long)]
        on_missing: Option<MissPolicy>,
    },

    /// Show row counts of an existing database
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a chemseed.toml with the default settings
    InitConfig {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_file = cli.config.clone();
    let settings = config::load_config(config_file.as_deref())?.unwrap_or_default();

    let command = cli.command.unwrap_or(Commands::Seed {
        database: None,
        dataset: None,
        on_missing: None,
    });

    match command {
        Commands::Seed { database, dataset, on_missing } => {
            let options = settings.resolve(database, on_missing);
            let dataset_path = settings.dataset_path(dataset);

            let data = match &dataset_path {
                Some(path) => {
                    tracing::info!("Loading dataset from {}", path.display());
                    Dataset::from_path(path)?
                }
                None => Dataset::builtin()?,
            };
            for (equation, formula) in data.missing_formulas() {
                tracing::debug!("'{}' references unknown formula {}", equation, formula);
            }

            ui::header("Seeding chemistry knowledge base");
            ui::status(Icons::DATABASE, "Database", &options.database.display().to_string());
            ui::status(
                Icons::DATASET,
                "Dataset",
                &dataset_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".to_string()),
            );
            ui::status(Icons::GEAR, "On missing formula", options.on_missing.as_str());

            config::ensure_db_dir(&options.database)?;
            let report = match seed_database(&options, &data) {
                Ok(report) => report,
                Err(e) => {
                    ui::error(&format!("Seeding failed: {}", e));
                    std::process::exit(1);
                }
            };

            if report.replaced_existing {
                ui::status(Icons::TRASH, "Replaced", "previous database file");
            }
            if !report.skipped.is_empty() {
                ui::section(&format!(" {} unresolved formulas ", report.skipped.len()));
                for link in &report.skipped {
                    ui::skipped_link(link);
                }
            }

            let store = SeedStore::open_existing(&options.database)?;
            let stats = store.stats()?;
            if !chemseed::output::is_quiet() {
                println!("{}", ui::stats_table(&stats));
            }

            ui::completed(&options.database);
        }

        Commands::Stats { database } => {
            let database = settings.resolve(database, None).database;
            if !database.exists() {
                anyhow::bail!("no database at {} (run `chemseed seed` first)", database.display());
            }

            let store = SeedStore::open_existing(&database)?;
            let stats = store.stats()?;

            ui::status(Icons::STATS, "Chemseed Statistics", &database.display().to_string());
            println!("{}", ui::stats_table(&stats));
        }

        Commands::InitConfig { force } => {
            let path = config_file.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &SeedConfig::with_defaults(), force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}
