//! Generic contract handles and factories.

use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use serde_json::Value;

use crate::abi::{self, DynSolValue};
use crate::artifact::Artifact;
use crate::chain::{Chain, Receipt, TransactionRequest};
use crate::error::{Error, Result};
use crate::Address;

/// A deployed contract bound to a chain and a sending account.
#[derive(Debug, Clone)]
pub struct Contract<C> {
    chain: C,
    abi: Arc<JsonAbi>,
    address: Address,
    from: Address,
}

impl<C: Chain> Contract<C> {
    pub fn new(chain: C, abi: Arc<JsonAbi>, address: Address, from: Address) -> Self {
        Self {
            chain,
            abi,
            address,
            from,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Same contract, different sending account.
    pub fn connect(&self, from: Address) -> Self {
        Self {
            from,
            ..self.clone()
        }
    }

    fn request(&self, method: &str, args: &[Value]) -> Result<TransactionRequest> {
        let function = abi::function(&self.abi, method, args.len())?;
        Ok(TransactionRequest {
            from: Some(self.from),
            to: Some(self.address),
            data: abi::encode_call(function, args)?.into(),
            value: None,
        })
    }

    /// Read-only call; decodes the return values.
    pub async fn call(&self, method: &str, args: &[Value]) -> Result<Vec<DynSolValue>> {
        let tx = self.request(method, args)?;
        let data = self.chain.call(&tx).await?;
        let function = abi::function(&self.abi, method, args.len())?;
        Ok(abi::decode_output(function, &data)?)
    }

    /// State-changing call; waits for the receipt.
    pub async fn send(&self, method: &str, args: &[Value]) -> Result<Receipt> {
        let tx = self.request(method, args)?;
        let receipt = self.chain.send_and_wait(&tx).await?;
        tracing::debug!(
            contract = %self.address,
            method,
            tx = %receipt.transaction_hash,
            "Transaction confirmed"
        );
        Ok(receipt)
    }
}

/// Deploys new instances of a compiled contract.
#[derive(Debug, Clone)]
pub struct ContractFactory<C> {
    chain: C,
    artifact: Artifact,
    from: Address,
}

impl<C: Chain> ContractFactory<C> {
    pub fn new(chain: C, artifact: Artifact, from: Address) -> Self {
        Self {
            chain,
            artifact,
            from,
        }
    }

    /// Send the creation transaction and wait until the contract exists.
    pub async fn deploy(&self, args: &[Value]) -> Result<Contract<C>> {
        let mut data = self.artifact.bytecode.to_vec();
        data.extend(abi::encode_constructor(&self.artifact.abi, args)?);
        let tx = TransactionRequest {
            from: Some(self.from),
            to: None,
            data: data.into(),
            value: None,
        };
        let receipt = self.chain.send_and_wait(&tx).await?;
        let address = receipt
            .contract_address
            .ok_or(Error::NoContractAddress(receipt.transaction_hash))?;
        tracing::debug!(
            contract = %self.artifact.contract_name,
            %address,
            tx = %receipt.transaction_hash,
            "Contract deployed"
        );
        Ok(Contract::new(
            self.chain.clone(),
            self.artifact.abi.clone(),
            address,
            self.from,
        ))
    }
}
