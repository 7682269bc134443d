use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use docsift_core::{Analyzer, AnalyzerConfig};
use tracing_subscriber::EnvFilter;

/// Analyze a file with a document-understanding service and print the
/// normalized report as JSON.
#[derive(Debug, Parser)]
#[command(name = "docsift", version)]
struct Args {
    /// File to analyze.
    file: PathBuf,

    /// Base URL of the unpack service.
    #[arg(long, default_value = "http://localhost:9998")]
    service_url: String,

    /// Per-attempt request timeout in seconds.
    #[arg(long, default_value_t = 160)]
    timeout: u32,

    /// Content types to skip instead of analyzing (repeatable; replaces the
    /// default ignore-list when given).
    #[arg(long = "ignore-type")]
    ignore_types: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AnalyzerConfig {
        service_url: args.service_url,
        request_timeout_seconds: args.timeout,
        ..Default::default()
    };
    if !args.ignore_types.is_empty() {
        config.ignore_types = args.ignore_types;
    }

    let analyzer = Analyzer::new(config)?;
    let report = analyzer.analyze_file(&args.file).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
