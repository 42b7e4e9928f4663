pub mod config;
pub mod csv_source;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod loader;
pub mod pipeline;
pub mod producer;
pub mod report;
pub mod searcher;
pub mod telemetry;
pub mod types;

use std::env;
use std::path::Path;
use tracing::{error, info};

use crate::config::Config;
use crate::csv_source::CsvSource;
use crate::dataset::{Dataset, JsonSource};
use crate::error::Error;
use crate::generator::SyntheticSource;
use crate::pipeline::RunOutcome;
use crate::report::Report;
use crate::types::{Command, DataSource, TransactionSource};

const USAGE: &str = "\
Usage: executor [COMMAND]
  sim              detect rings in a synthetic dataset (default)
  csv <path>       detect rings in a CSV file (from,to,amount,timestamp)
  json <path>      detect rings in a JSON dataset
  generate <path>  write a synthetic JSON dataset";

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let config = match crate::config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load config");
            std::process::exit(1);
        }
    };

    let result = match command {
        Command::Generate(path) => generate_dataset(&config, Path::new(&path)),
        Command::Detect(source) => run_detection(&config, &source).await,
    };

    if let Err(e) = result {
        error!(error = %e, "run failed");
        std::process::exit(1);
    }
}

/// Parse command-line arguments (without the program name).
fn parse_args(args: &[String]) -> Result<Command, Error> {
    let mode = args
        .first()
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "sim".to_string());

    let path = || {
        args.get(1)
            .cloned()
            .ok_or_else(|| Error::Usage(format!("A file path is required for '{}'.", mode)))
    };

    match mode.as_str() {
        "sim" => Ok(Command::Detect(DataSource::Sim)),
        "csv" => Ok(Command::Detect(DataSource::Csv(path()?))),
        "json" => Ok(Command::Detect(DataSource::Json(path()?))),
        "generate" => Ok(Command::Generate(path()?)),
        other => Err(Error::Usage(format!("Unknown command '{}'.", other))),
    }
}

fn generate_dataset(config: &Config, path: &Path) -> Result<(), Error> {
    let mut source = SyntheticSource::new(config.generator.clone(), config.pipeline.batch_size);
    let transactions = source.generate_transactions();
    let accounts = source.accounts();

    Dataset::new(&accounts, &transactions, config.generator.ring_ratio).save(path)?;

    info!(
        path = %path.display(),
        users = accounts.len(),
        transactions = transactions.len(),
        "dataset generated"
    );
    Ok(())
}

async fn run_detection(config: &Config, source: &DataSource) -> Result<(), Error> {
    let batch_size = config.pipeline.batch_size;

    let outcome = match source {
        DataSource::Sim => {
            info!("Starting synthetic source...");
            let source = SyntheticSource::new(config.generator.clone(), batch_size);
            pipeline::run(source, config).await?
        }
        DataSource::Csv(path) => {
            info!(path = %path, "Starting CSV source...");
            let source = CsvSource::open(
                path.clone(),
                batch_size,
                config.generator.num_users,
                config.pipeline.max_accounts,
            )?;
            pipeline::run(source, config).await?
        }
        DataSource::Json(path) => {
            info!(path = %path, "Starting JSON source...");
            let source = JsonSource::open(Path::new(path), batch_size)?;
            pipeline::run(source, config).await?
        }
    };

    print_report(&outcome, config);
    Ok(())
}

fn print_report(outcome: &RunOutcome, config: &Config) {
    println!("\n==============================");
    println!(" Fraud Ring Detection System");
    println!("==============================");
    println!(
        "Graph created in {:.3} ms.",
        outcome.seed_time.as_secs_f64() * 1_000.0
    );

    let report = Report {
        stats: outcome.graph.stats(),
        accounts: outcome.graph.accounts(),
        brute_force: &outcome.brute_force,
        tarjan: &outcome.tarjan,
        max_cycles_shown: config.report.max_cycles_shown,
    };
    println!("{}", report);
}
