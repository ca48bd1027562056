use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use ethers::prelude::{Transaction, TransactionReceipt};
use ethers_core::types::{H256, U256};
use ethers_providers::{Http, Middleware, Provider};
use log::debug;

use crate::models::{LogEntry, ReceiptRecord, TransactionRecord};

/// Read-only access to transaction data. `Ok(None)` means the node does not know the hash.
pub trait ChainSource: Send + Sync + 'static {
    fn get_transaction(
        &self,
        hash: H256,
    ) -> impl Future<Output = Result<Option<TransactionRecord>>> + Send;

    fn get_transaction_receipt(
        &self,
        hash: H256,
    ) -> impl Future<Output = Result<Option<ReceiptRecord>>> + Send;
}

pub struct EthereumClient {
    provider: Arc<Provider<Http>>,
}

impl EthereumClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let provider = Arc::new(provider);

        Ok(Self { provider })
    }
}

impl ChainSource for EthereumClient {
    async fn get_transaction(&self, hash: H256) -> Result<Option<TransactionRecord>> {
        debug!("eth_getTransactionByHash {:#x}", hash);
        let tx = self.provider.get_transaction(hash).await?;
        Ok(tx.map(|tx| transaction_record(&tx)))
    }

    async fn get_transaction_receipt(&self, hash: H256) -> Result<Option<ReceiptRecord>> {
        debug!("eth_getTransactionReceipt {:#x}", hash);
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt.map(|receipt| receipt_record(&receipt)))
    }
}

pub fn transaction_record(tx: &Transaction) -> TransactionRecord {
    TransactionRecord {
        hash: format!("0x{:x}", tx.hash),
        sender: format!("0x{:x}", tx.from),
        receiver: tx.to.map(|to| format!("0x{:x}", to)),
        value_wei: tx.value,
    }
}

/// `None` when the node sent a value that does not fit; callers fall back to position.
fn u256_to_u64(value: U256) -> Option<u64> {
    (value <= U256::from(u64::MAX)).then(|| value.as_u64())
}

pub fn receipt_record(receipt: &TransactionReceipt) -> ReceiptRecord {
    ReceiptRecord {
        sender: format!("0x{:x}", receipt.from),
        receiver: receipt.to.map(|to| format!("0x{:x}", to)),
        status: receipt.status.map(|s| s.as_u64() == 1),
        block_number: receipt.block_number.map(|n| n.as_u64()),
        gas_used: receipt.gas_used.unwrap_or_default(),
        effective_gas_price_wei: receipt.effective_gas_price.unwrap_or(U256::zero()),
        contract_address: receipt.contract_address.map(|a| format!("0x{:x}", a)),
        logs: receipt
            .logs
            .iter()
            .map(|log| LogEntry {
                address: format!("0x{:x}", log.address),
                log_index: log.log_index.and_then(u256_to_u64),
            })
            .collect(),
    }
}
