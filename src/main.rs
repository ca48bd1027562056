mod analyzer;
mod cli;
mod config;
mod error;
mod ethereum;
mod graph;
mod interactive;
mod models;
mod render;
mod session;
mod units;
mod validation;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::{error, warn};
use tokio::io::BufReader;

use analyzer::Analyzer;
use cli::{Cli, Commands};
use config::Config;
use ethereum::EthereumClient;
use validation::validate_tx_hash;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load(cli.rpc_url, cli.edge_labels)?;

    match cli.command {
        Commands::Analyze { hash, format } => {
            let analyzer = build_analyzer(&config);
            let result = match validate_tx_hash(&hash) {
                Ok(hash) => analyzer.analyze(hash).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(analysis) => println!("{}", render::render_analysis(&analysis, format)?),
                Err(e) => {
                    error!("Analysis of {} failed: {}", hash, e);
                    eprintln!("{}", render::render_error(&e, format));
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate { hash } => match validate_tx_hash(&hash) {
            Ok(hash) => println!("Valid transaction hash: {:#x}", hash),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        Commands::Interactive { format } => {
            let analyzer = Arc::new(build_analyzer(&config));
            let input = BufReader::new(tokio::io::stdin());
            interactive::run(analyzer, input, &mut std::io::stdout(), format).await?;
        }
    }

    Ok(())
}

/// A bad URL is reported and treated like a missing one, so each analysis fails with a
/// configuration error instead of aborting the process.
fn build_analyzer(config: &Config) -> Analyzer<EthereumClient> {
    let client = match config.ethereum_rpc_url.as_deref() {
        Some(url) => match EthereumClient::new(url) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Ignoring unusable RPC URL {}: {}", url, e);
                None
            }
        },
        None => None,
    };

    Analyzer::new(client, config.edge_labels)
}
