use anyhow::{anyhow, Result};
use clap::ValueEnum;
use log::warn;

use crate::graph::EdgeLabelMode;

#[derive(Debug, Clone)]
pub struct Config {
    /// Missing is allowed: each analysis then fails with a configuration error.
    pub ethereum_rpc_url: Option<String>,
    pub edge_labels: EdgeLabelMode,
}

impl Config {
    /// Command-line values take precedence; the environment is only consulted for what
    /// they leave unset.
    pub fn load(rpc_url: Option<String>, edge_labels: Option<EdgeLabelMode>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::resolve(
            rpc_url.or_else(|| std::env::var("ETHEREUM_RPC_URL").ok()),
            edge_labels,
            std::env::var("EDGE_LABELS").ok(),
        )
    }

    fn resolve(
        rpc_url: Option<String>,
        edge_labels: Option<EdgeLabelMode>,
        edge_labels_env: Option<String>,
    ) -> Result<Self> {
        let ethereum_rpc_url = rpc_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if ethereum_rpc_url.is_none() {
            warn!("ETHEREUM_RPC_URL is not set; analyses will fail until it is configured");
        }

        let edge_labels = match (edge_labels, edge_labels_env.as_deref().map(str::trim)) {
            (Some(mode), _) => mode,
            (None, None) | (None, Some("")) => EdgeLabelMode::default(),
            (None, Some(value)) => EdgeLabelMode::from_str(value, true)
                .map_err(|e| anyhow!("Unknown EDGE_LABELS value {}: {}", value, e))?,
        };

        Ok(Self {
            ethereum_rpc_url,
            edge_labels,
        })
    }
}
