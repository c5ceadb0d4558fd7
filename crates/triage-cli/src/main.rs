//! Command-line complaint triage.
//!
//! Loads the trained artifact set once, then classifies a narrative's
//! product category, scores escalation risk per company response type,
//! and prints the recommended response. The probability chart is written
//! on request; a chart failure never blocks the recommendation.
//!
//! ```bash
//! # Triage a narrative, human-readable output
//! triage-cli predict --narrative "I was charged overdraft fees twice!"
//!
//! # From a file, JSON output plus chart
//! triage-cli predict --file complaint.txt --json --chart escalation_prob.svg
//!
//! # Inspect the loaded artifact set
//! triage-cli inspect --artifacts ./trained_models
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use triage::{Predictor, TriageConfig};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the trained artifacts (overrides TRIAGE_ARTIFACT_DIR)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    /// Path to a TOML config file (overrides the defaults entirely)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Triage one complaint narrative
    Predict {
        /// The narrative text itself
        #[arg(long, conflicts_with = "file")]
        narrative: Option<String>,

        /// Read the narrative from a file (reads stdin when neither
        /// --narrative nor --file is given)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Emit the full prediction as JSON instead of a report
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write the probability bar chart to this path
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Load the artifact set and print its schema summary
    Inspect,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    match args.command {
        Command::Predict {
            narrative,
            file,
            json,
            chart,
        } => predict(&config, narrative, file, json, chart),
        Command::Inspect => inspect(&config),
    }
}

fn resolve_config(args: &Args) -> Result<TriageConfig> {
    let mut config = match &args.config {
        Some(path) => TriageConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TriageConfig::default(),
    };
    if let Some(dir) = &args.artifacts {
        config.artifact_dir = dir.clone();
    }
    Ok(config)
}

fn read_narrative(narrative: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (narrative, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read narrative file {}", path.display())),
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read narrative from stdin")?;
            Ok(buffer)
        }
    }
}

fn predict(
    config: &TriageConfig,
    narrative: Option<String>,
    file: Option<PathBuf>,
    json: bool,
    chart: Option<PathBuf>,
) -> Result<()> {
    let predictor = Predictor::from_config(config).context("Failed to load artifact set")?;
    let narrative = read_narrative(narrative, file)?;

    let result = predictor
        .predict(&narrative)
        .context("Prediction failed")?;

    if let Some(chart_path) = chart {
        // Presentational only: the recommendation still prints if the
        // chart cannot be written.
        if let Err(e) = triage::chart::render_bar_chart(&result.probabilities, &chart_path) {
            warn!("Chart rendering failed: {e}");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Product category:     {}", result.product);
        println!("Escalation risk by response type:");
        for (response, probability) in result.probabilities.iter() {
            let marker = if response == result.recommended {
                " <- recommended"
            } else {
                ""
            };
            println!("  {probability:>7.3}  {response}{marker}");
        }
        println!("Recommended response: {}", result.recommended);
    }
    Ok(())
}

fn inspect(config: &TriageConfig) -> Result<()> {
    let predictor = Predictor::from_config(config).context("Failed to load artifact set")?;
    let artifacts = predictor.artifacts();

    info!("Artifact set is consistent");
    println!("Artifact dir:        {}", config.artifact_dir.display());
    println!("Vocabulary size:     {}", artifacts.vectorizer.dimension());
    println!(
        "Escalation features: {}",
        artifacts.escalation_model.n_features()
    );
    println!("Product labels:      {}", artifacts.product_labels.len());
    for label in &artifacts.product_labels {
        println!("  - {label}");
    }
    println!("Stop words:          {}", artifacts.stopwords.len());
    println!(
        "Policy:              threshold {:.2}, preferred ceiling {:.2}",
        config.policy.escalation_threshold,
        config.policy.preferred_ceiling()
    );
    Ok(())
}
