//! The seam between contract handles and whatever executes transactions.
//!
//! [`crate::rpc::RpcClient`] implements it against a live node; tests plug in
//! an in-memory double.

use crate::error::{Error, Result};
use crate::{Address, Bytes, TxHash, U256};

/// Parameters for `eth_sendTransaction` / `eth_call`.
///
/// `to: None` is a contract creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub data: Bytes,
    pub value: Option<U256>,
}

/// The subset of a transaction receipt the workflow looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub contract_address: Option<Address>,
    pub status: bool,
    pub block_number: Option<u64>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status
    }
}

/// Executes transactions and read-only calls on behalf of node-managed
/// accounts.
#[allow(async_fn_in_trait)]
pub trait Chain: Clone {
    /// Accounts the node can sign for, in node order.
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Submit a transaction; returns once the node has accepted it.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash>;

    /// Block until the transaction is mined.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt>;

    /// Execute a read-only call against the latest block.
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes>;

    /// Submit, wait for the receipt, and fail on a reverted status.
    async fn send_and_wait(&self, tx: &TransactionRequest) -> Result<Receipt> {
        let hash = self.send_transaction(tx).await?;
        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.succeeded() {
            return Err(Error::Reverted(hash));
        }
        Ok(receipt)
    }
}
