//! # headline_digest
//!
//! Fetches a news listing page, picks the newest article links, extracts each
//! article's main text and prints a three-sentence factual summary produced
//! by a language model.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=AIza... headline_digest -n 3
//! ```
//!
//! ## Architecture
//!
//! A single sequential pipeline:
//! 1. **Listing**: fetch the index page and discover article links
//! 2. **Fetching**: download each article (failures skip that article)
//! 3. **Extraction**: readability, then content-container paragraphs, then visible text
//! 4. **Summarizing**: fixed prompt, up to 3 attempts with linear backoff
//! 5. **Output**: per-article header and summary on stdout
//!
//! Diagnostics go to stderr through `tracing`; stdout carries only the digest.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod providers;
mod scrapers;
mod summarizer;
mod utils;

use cli::Cli;
use pipeline::Pipeline;
use providers::LlmClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_digest starting up");

    let args = Cli::parse();
    debug!(?args.config, "Parsed CLI arguments");

    let config = args.into_config().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;
    info!(
        listing_url = %config.listing_url,
        num_articles = config.num_articles,
        provider = ?config.provider,
        model = %config.model_name,
        "Loaded configuration"
    );

    let client = LlmClient::from_config(&config).inspect_err(|e| {
        error!(error = %e, "Cannot initialize model client");
    })?;
    info!(model = client.model(), "Model client ready");

    let mut pipeline = Pipeline::new(config, client, std::io::stdout().lock())?;
    let report = pipeline.run().await.inspect_err(|e| {
        error!(error = %e, "Run aborted");
    })?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        attempted = report.attempted,
        summarized = report.summarized,
        failed = report.failed,
        "Execution complete"
    );
    Ok(())
}
