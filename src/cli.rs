use clap::{Parser, Subcommand, ValueEnum};

use crate::graph::EdgeLabelMode;

#[derive(Parser)]
#[command(name = "tx-graph")]
#[command(about = "Fetch an Ethereum transaction and render it as a small address graph")]
pub struct Cli {
    /// JSON-RPC endpoint. Overrides ETHEREUM_RPC_URL.
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Labelling for receiver-to-contract edges. Overrides EDGE_LABELS.
    #[arg(long, global = true, value_enum)]
    pub edge_labels: Option<EdgeLabelMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Analyze {
        hash: String,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    Validate {
        hash: String,
    },
    /// Read hashes from stdin; `reset` clears the session, `quit` exits.
    Interactive {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Dot,
}
