use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Invalid transaction hash: expected 0x followed by 64 hex characters")]
    Validation,

    #[error("ETHEREUM_RPC_URL is not configured")]
    Configuration,

    #[error("Transaction {0} not found")]
    NotFound(String),

    #[error("Failed to fetch transaction data: {0}")]
    Transport(String),
}

impl AnalysisError {
    /// Short category name, used by the text and JSON outputs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation => "validation",
            AnalysisError::Configuration => "configuration",
            AnalysisError::NotFound(_) => "not_found",
            AnalysisError::Transport(_) => "transport",
        }
    }
}
