use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use timeblock_planner::domain::{DateRange, SystemClock};
use timeblock_planner::infrastructure::{AppConfig, DatabaseManager, initialize_services};
use timeblock_planner::utils::setup_logging;

#[derive(Parser, Debug)]
#[command(name = "timeblock", about = "Time-blocking planner maintenance and reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Print seven-day, thirty-day and work-week hours as JSON
    Stats {
        #[arg(long)]
        user: u64,
        /// Anchor date (defaults to the user's local today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the rollup of an inclusive date range as JSON
    Rollup {
        #[arg(long)]
        user: u64,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Delete plans and completed items older than the retention window
    Cleanup {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Complete an item, creating its next occurrence when it recurs
    Complete {
        #[arg(long)]
        user: u64,
        #[arg(long)]
        item: u64,
    },
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(2);
        }
    };
    setup_logging(&config.log_level);

    if let Err(e) = run(args, config).await {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Cli, config: AppConfig) -> Result<()> {
    let db = DatabaseManager::new(&config.database_path)?;
    db.initialize_database()
        .await
        .context("Failed to initialize database schema")?;

    let services = initialize_services(&config, &db, Arc::new(SystemClock));

    match args.command {
        Commands::Init => {
            info!("Database ready at {}", config.database_path);
        }
        Commands::Stats { user, date } => {
            let stats = services.work_hours.work_hour_stats(user, date).await?;
            print_json(&stats)?;
        }
        Commands::Rollup { user, from, to } => {
            let Some(range) = DateRange::new(from, to) else {
                bail!("--to ({to}) must not be before --from ({from})");
            };
            let result = services.work_hours.rollup_range(user, range).await?;
            print_json(&result)?;
        }
        Commands::Cleanup { days } => {
            let days = days.unwrap_or(config.retention_days);
            let report = services.plans.cleanup_old_data(days).await?;
            print_json(&report)?;
        }
        Commands::Complete { user, item } => {
            let completion = services.items.complete_item(user, item).await?;
            print_json(&completion)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}
