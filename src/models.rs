use chrono::{DateTime, Utc};
use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub sender: String,
    pub receiver: Option<String>,
    pub value_wei: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub sender: String,
    pub receiver: Option<String>,
    pub status: Option<bool>,
    pub block_number: Option<u64>,
    pub gas_used: U256,
    pub effective_gas_price_wei: U256,
    pub contract_address: Option<String>,
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub address: String,
    pub log_index: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Sender,
    Receiver,
    Contract,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub position: Position,
    pub label: String,
    pub role: NodeRole,
    pub emission_count: usize,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionSummary {
    pub hash: String,
    pub from: String,
    /// `None` for contract creation.
    pub to: Option<String>,
    pub created_contract: Option<String>,
    pub value_eth: String,
    pub status: Option<bool>,
    pub block_number: Option<u64>,
    pub gas_used: String,
    pub effective_gas_price_gwei: String,
    pub fee_eth: String,
    pub log_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub summary: TransactionSummary,
    pub graph: Graph,
    pub analyzed_at: DateTime<Utc>,
}
