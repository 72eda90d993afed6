//! tabular-holdout - run a train/validation/test holdout experiment on a CSV file

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tabular_holdout::dataset::CsvLoader;
use tabular_holdout::workflow::{HoldoutConfig, HoldoutExperiment};

#[derive(Parser)]
#[command(name = "tabular-holdout")]
#[command(author, version, about = "Holdout evaluation of a linear model on tabular data", long_about = None)]
struct Cli {
    /// CSV file with a header row
    #[arg(short, long)]
    data: PathBuf,

    /// JSON experiment configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Write the fitted pipeline to this file
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Log per-stage details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = HoldoutConfig::from_json_file(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;

    let columns = std::iter::once(&config.target)
        .chain(&config.numeric_columns)
        .chain(&config.categorical_columns)
        .cloned()
        .collect::<Vec<_>>();
    let dataset = CsvLoader::new()
        .with_columns(columns)
        .with_categorical(config.categorical_columns.iter().cloned())
        .load(&cli.data)
        .with_context(|| format!("Failed to load data {:?}", cli.data))?;
    info!("Loaded {} records from {:?}", dataset.len(), cli.data);

    let run = HoldoutExperiment::new(config)?.run(&dataset)?;

    if let Some(path) = &cli.save {
        run.pipeline
            .save_to_file(path)
            .with_context(|| format!("Failed to save pipeline to {:?}", path))?;
        info!("Saved fitted pipeline to {:?}", path);
    }

    println!("{}", serde_json::to_string_pretty(&run.report)?);
    Ok(())
}
