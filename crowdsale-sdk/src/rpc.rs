//! Ethereum JSON-RPC client: an alloy `RootProvider` over HTTP.
//!
//! No fillers and no wallet: the node owns the accounts, so transactions go
//! out as plain `eth_sendTransaction` and the node fills nonce and gas.

use std::fmt;
use std::time::Duration;

use alloy::network::Ethereum;
use alloy::primitives::TxKind;
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::ClientBuilder;
use alloy::rpc::types::{TransactionInput, TransactionRequest as RpcTransaction};
use alloy::transports::http::Http;
use alloy::transports::{RpcError, TransportError};

use crate::chain::{Chain, Receipt, TransactionRequest};
use crate::error::{Error, Result};
use crate::{Address, Bytes, TxHash};

/// Default local development node (Hardhat / Anvil).
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    provider: RootProvider<Ethereum>,
    poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("url", &self.url)
            .field("poll_interval", &self.poll_interval)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let endpoint = url.parse::<reqwest::Url>().map_err(|e| Error::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Client)?;
        let client = ClientBuilder::default().transport(Http::with_client(http, endpoint), false);
        Ok(Self {
            url,
            provider: RootProvider::new(client),
            poll_interval: Duration::from_millis(250),
            confirmation_timeout: Duration::from_secs(120),
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    fn error(&self, method: &'static str, err: TransportError) -> Error {
        match err {
            RpcError::ErrorResp(payload) => Error::Rpc {
                method: method.to_string(),
                code: payload.code,
                message: payload.message.to_string(),
            },
            source => Error::Transport {
                url: self.url.clone(),
                method,
                source,
            },
        }
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| self.error("eth_chainId", e))
    }
}

fn rpc_transaction(tx: &TransactionRequest) -> RpcTransaction {
    RpcTransaction {
        from: tx.from,
        to: tx.to.map(TxKind::Call),
        value: tx.value,
        // Older Hardhat nodes only read `data`, newer nodes prefer `input`.
        input: TransactionInput {
            input: Some(tx.data.clone()),
            data: Some(tx.data.clone()),
        },
        ..Default::default()
    }
}

impl Chain for RpcClient {
    async fn accounts(&self) -> Result<Vec<Address>> {
        self.provider
            .get_accounts()
            .await
            .map_err(|e| self.error("eth_accounts", e))
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash> {
        let pending = self
            .provider
            .send_transaction(rpc_transaction(tx))
            .await
            .map_err(|e| self.error("eth_sendTransaction", e))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt> {
        let started = tokio::time::Instant::now();
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| self.error("eth_getTransactionReceipt", e))?;
            if let Some(receipt) = receipt {
                tracing::debug!(tx = %hash, block = ?receipt.block_number, "Transaction mined");
                return Ok(Receipt {
                    transaction_hash: receipt.transaction_hash,
                    contract_address: receipt.contract_address,
                    status: receipt.status(),
                    block_number: receipt.block_number,
                });
            }
            if started.elapsed() >= self.confirmation_timeout {
                return Err(Error::ReceiptTimeout {
                    hash,
                    secs: self.confirmation_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        self.provider
            .call(rpc_transaction(tx))
            .await
            .map_err(|e| self.error("eth_call", e))
    }
}
