use chrono::Utc;
use ethers_core::types::H256;
use log::{debug, info};

use crate::ethereum::ChainSource;
use crate::error::AnalysisError;
use crate::graph::{synthesize, EdgeLabelMode};
use crate::models::{Analysis, ReceiptRecord, TransactionRecord, TransactionSummary};
use crate::units::{format_ether, format_gwei};

/// Fetches a transaction and its receipt and turns them into an [`Analysis`].
///
/// With no source configured every call fails with [`AnalysisError::Configuration`]
/// before anything is sent.
pub struct Analyzer<S> {
    source: Option<S>,
    edge_labels: EdgeLabelMode,
}

impl<S: ChainSource> Analyzer<S> {
    pub fn new(source: Option<S>, edge_labels: EdgeLabelMode) -> Self {
        Self {
            source,
            edge_labels,
        }
    }

    pub async fn analyze(&self, hash: H256) -> Result<Analysis, AnalysisError> {
        let source = self.source.as_ref().ok_or(AnalysisError::Configuration)?;
        let hash_str = format!("{:#x}", hash);

        info!("Fetching transaction {}", hash_str);
        let (tx, receipt) = tokio::join!(
            source.get_transaction(hash),
            source.get_transaction_receipt(hash)
        );

        let tx = tx
            .map_err(|e| AnalysisError::Transport(e.to_string()))?
            .ok_or_else(|| AnalysisError::NotFound(hash_str.clone()))?;
        let receipt = receipt
            .map_err(|e| AnalysisError::Transport(e.to_string()))?
            .ok_or_else(|| AnalysisError::NotFound(hash_str.clone()))?;

        debug!("Receipt for {} carries {} logs", hash_str, receipt.logs.len());

        let graph = synthesize(&tx, &receipt, self.edge_labels);
        info!(
            "Built graph for {}: {} nodes, {} edges",
            hash_str,
            graph.nodes.len(),
            graph.edges.len()
        );

        Ok(Analysis {
            summary: summarize(&tx, &receipt),
            graph,
            analyzed_at: Utc::now(),
        })
    }
}

pub fn summarize(tx: &TransactionRecord, receipt: &ReceiptRecord) -> TransactionSummary {
    let fee = receipt
        .gas_used
        .saturating_mul(receipt.effective_gas_price_wei);

    TransactionSummary {
        hash: tx.hash.clone(),
        from: tx.sender.clone(),
        to: tx.receiver.clone(),
        created_contract: receipt.contract_address.clone(),
        value_eth: format_ether(tx.value_wei),
        status: receipt.status,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used.to_string(),
        effective_gas_price_gwei: format_gwei(receipt.effective_gas_price_wei),
        fee_eth: format_ether(fee),
        log_count: receipt.logs.len(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::LogEntry;
    use anyhow::anyhow;
    use ethers_core::types::U256;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub const SENDER: &str = "0x1111111111111111111111111111111111111111";
    pub const RECEIVER: &str = "0x2222222222222222222222222222222222222222";

    pub enum Reply<T> {
        Found(T),
        Missing,
        Fail(&'static str),
    }

    impl<T: Clone> Reply<T> {
        fn get(&self) -> anyhow::Result<Option<T>> {
            match self {
                Reply::Found(v) => Ok(Some(v.clone())),
                Reply::Missing => Ok(None),
                Reply::Fail(msg) => Err(anyhow!(*msg)),
            }
        }
    }

    pub struct StubSource {
        pub tx: Reply<TransactionRecord>,
        pub receipt: Reply<ReceiptRecord>,
        pub calls: Arc<AtomicUsize>,
    }

    impl ChainSource for StubSource {
        async fn get_transaction(&self, _hash: H256) -> anyhow::Result<Option<TransactionRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tx.get()
        }

        async fn get_transaction_receipt(
            &self,
            _hash: H256,
        ) -> anyhow::Result<Option<ReceiptRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.receipt.get()
        }
    }

    pub fn sample_tx() -> TransactionRecord {
        TransactionRecord {
            hash: format!("{:#x}", H256::repeat_byte(0xab)),
            sender: SENDER.to_string(),
            receiver: Some(RECEIVER.to_string()),
            value_wei: U256::from_dec_str("1500000000000000000").unwrap(),
        }
    }

    pub fn sample_receipt() -> ReceiptRecord {
        ReceiptRecord {
            sender: SENDER.to_string(),
            receiver: Some(RECEIVER.to_string()),
            status: Some(true),
            block_number: Some(18_000_000),
            gas_used: U256::from(21_000),
            effective_gas_price_wei: U256::from(10_000_000_000u64),
            contract_address: None,
            logs: vec![LogEntry {
                address: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
                log_index: Some(0),
            }],
        }
    }

    pub fn stub(tx: Reply<TransactionRecord>, receipt: Reply<ReceiptRecord>) -> StubSource {
        StubSource {
            tx,
            receipt,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[tokio::test]
    async fn builds_summary_and_graph() {
        let analyzer = Analyzer::new(
            Some(stub(Reply::Found(sample_tx()), Reply::Found(sample_receipt()))),
            EdgeLabelMode::None,
        );

        let analysis = analyzer.analyze(H256::repeat_byte(0xab)).await.unwrap();
        assert_eq!(analysis.summary.value_eth, "1.5");
        assert_eq!(analysis.summary.fee_eth, "0.00021");
        assert_eq!(analysis.summary.effective_gas_price_gwei, "10");
        assert_eq!(analysis.summary.block_number, Some(18_000_000));
        assert_eq!(analysis.summary.log_count, 1);
        assert_eq!(analysis.graph.nodes.len(), 3);
        assert_eq!(analysis.graph.edges.len(), 2);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found_even_if_receipt_resolves() {
        let analyzer = Analyzer::new(
            Some(stub(Reply::Missing, Reply::Found(sample_receipt()))),
            EdgeLabelMode::None,
        );

        let err = analyzer.analyze(H256::repeat_byte(0xab)).await.unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_receipt_is_not_found() {
        let analyzer = Analyzer::new(
            Some(stub(Reply::Found(sample_tx()), Reply::Missing)),
            EdgeLabelMode::None,
        );

        let err = analyzer.analyze(H256::repeat_byte(0xab)).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn fetch_failure_is_transport_error() {
        let analyzer = Analyzer::new(
            Some(stub(Reply::Found(sample_tx()), Reply::Fail("connection refused"))),
            EdgeLabelMode::None,
        );

        let err = analyzer.analyze(H256::repeat_byte(0xab)).await.unwrap_err();
        assert_eq!(err, AnalysisError::Transport("connection refused".to_string()));
    }

    #[tokio::test]
    async fn transaction_error_wins_when_both_fail() {
        let analyzer = Analyzer::new(
            Some(stub(Reply::Fail("tx"), Reply::Missing)),
            EdgeLabelMode::None,
        );

        let err = analyzer.analyze(H256::repeat_byte(0xab)).await.unwrap_err();
        assert_eq!(err, AnalysisError::Transport("tx".to_string()));
    }

    #[tokio::test]
    async fn both_requests_are_issued() {
        let source = stub(Reply::Found(sample_tx()), Reply::Found(sample_receipt()));
        let calls = source.calls.clone();
        let analyzer = Analyzer::new(Some(source), EdgeLabelMode::None);

        analyzer.analyze(H256::zero()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unconfigured_source_fails_fast() {
        let analyzer: Analyzer<StubSource> = Analyzer::new(None, EdgeLabelMode::None);

        let err = analyzer.analyze(H256::zero()).await.unwrap_err();
        assert_eq!(err, AnalysisError::Configuration);
    }

    #[test]
    fn creation_summary_has_no_receiver() {
        let mut tx = sample_tx();
        tx.receiver = None;
        let mut receipt = sample_receipt();
        receipt.contract_address = Some("0x3333333333333333333333333333333333333333".to_string());

        let summary = summarize(&tx, &receipt);
        assert_eq!(summary.to, None);
        assert!(summary.created_contract.is_some());
    }
}
