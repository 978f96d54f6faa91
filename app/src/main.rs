// ==============================================================================
// main.rs - SNP Risk Predictor Entry Point
// ==============================================================================
// Description: Command line front end for single-sample SNP risk evaluation
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snp_risk_predictor::config::{
    DEFAULT_OVERLAP_URL, DEFAULT_SPECIES, DEFAULT_TIMEOUT_SECS, DEFAULT_VEP_URL,
};
use snp_risk_predictor::output::{self, OutputFormat};
use snp_risk_predictor::{ColumnMap, LookupConfig, RiskContext};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SNP association dataset (.csv, .tsv, .xlsx, ...)
    #[arg(short, long, env = "SNP_DATASET", default_value = "mmc4.xlsx")]
    dataset: PathBuf,

    /// Linear risk model artifact (JSON)
    #[arg(short, long, env = "SNP_MODEL", default_value = "model.json")]
    model: PathBuf,

    /// Ensembl overlap service (coordinate build must match the dataset)
    #[arg(long, env = "ENSEMBL_OVERLAP_URL", default_value = DEFAULT_OVERLAP_URL)]
    overlap_url: String,

    /// Ensembl VEP service
    #[arg(long, env = "ENSEMBL_VEP_URL", default_value = DEFAULT_VEP_URL)]
    vep_url: String,

    /// Ensembl species name
    #[arg(long, env = "ENSEMBL_SPECIES", default_value = DEFAULT_SPECIES)]
    species: String,

    /// Per-request timeout for Ensembl lookups
    #[arg(long, env = "ENSEMBL_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show dataset size and the valid sample index range
    Summary,

    /// Predict risk and annotate one sample
    Evaluate {
        /// Zero-based sample index
        #[arg(short, long, default_value_t = 0)]
        sample: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snp_risk_predictor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if args.timeout_secs == 0 {
        anyhow::bail!("--timeout-secs must be greater than zero");
    }

    let config = LookupConfig {
        overlap_base_url: args.overlap_url,
        vep_base_url: args.vep_url,
        species: args.species,
        timeout: Duration::from_secs(args.timeout_secs),
    };

    info!("SNP Risk Predictor starting...");

    let context = RiskContext::load(&args.dataset, &args.model, &ColumnMap::default(), &config)
        .context("Startup failed")?;

    match args.command {
        Command::Summary => {
            print!("{}", output::render_summary(context.dataset(), context.model_name()));
        }
        Command::Evaluate { sample, format } => {
            let report = context
                .evaluate(sample)
                .await
                .with_context(|| match context.dataset().last_index() {
                    Some(last) => format!("Select a sample index from 0 to {}", last),
                    None => "Dataset is empty".to_string(),
                })?;

            match format {
                OutputFormat::Text => print!("{}", output::render_text(&report)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&output::render_json(&report))?)
                }
            }
        }
    }

    Ok(())
}
