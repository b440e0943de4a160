use anyhow::Result;
use clap::{Parser, Subcommand};
use farescrape::config::{load_plan_file, load_plans_from_dir};
use farescrape::driver::ReplayBrowser;
use farescrape::harness::{HarnessOptions, run_harness};
use farescrape::pipeline::{ScrapeOptions, run_scrape};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "farescrape", about = "Flight-itinerary text scraper producing a CSV table")]
struct Cli {
    #[arg(long, default_value = "configs/plans")]
    config_dir: PathBuf,

    #[arg(long, default_value = "data/out")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Scrape {
        #[arg(long)]
        pages_dir: PathBuf,
        #[arg(long)]
        plan: Option<String>,
    },
    Validate {
        #[arg(long)]
        plan_file: Option<PathBuf>,
    },
    Harness,
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { pages_dir, plan } => {
            let mut browser = ReplayBrowser::from_dir(&pages_dir)?;
            let reports = run_scrape(
                &ScrapeOptions {
                    config_dir: cli.config_dir,
                    out_path: cli.out_dir.join("flights.csv"),
                    plan,
                },
                &mut browser,
            )?;

            for report in reports {
                info!(
                    query = %report.query,
                    blocks = report.blocks_seen,
                    parsed = report.records_parsed,
                    rejected = report.blocks_rejected,
                    timed_out = report.timed_out,
                    "query summary"
                );
            }
        }
        Commands::Validate { plan_file } => {
            if let Some(file) = plan_file {
                let plan = load_plan_file(&file)?;
                println!("OK: {} ({})", plan.config.plan.key, file.display());
            } else {
                for plan in load_plans_from_dir(&cli.config_dir)? {
                    println!("OK: {} ({})", plan.config.plan.key, plan.path.display());
                }
            }
        }
        Commands::Harness => {
            let report = run_harness(&HarnessOptions {
                out_dir: cli.out_dir.join("harness"),
            })?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
