//! crowdsale-sdk: chain plumbing for the GameloftToken / CrowdSale pair.
//!
//! Talks to an Ethereum JSON-RPC node whose accounts are unlocked (a Hardhat
//! or Anvil development node). Signing, gas and nonce handling stay on the
//! node; this crate encodes calls, submits them and waits for receipts.
//! Primitives, the JSON ABI and the transport come from `alloy`.
//!
//! - [`rpc::RpcClient`]: alloy provider over HTTP, implements [`chain::Chain`]
//! - [`abi`]: JSON arguments coerced to the artifact ABI's declared types
//! - [`contract`]: generic contract handles and factories
//! - [`contracts`]: typed wrappers for the token and the sale contract

pub mod abi;
pub mod artifact;
pub mod chain;
pub mod contract;
pub mod contracts;
pub mod error;
pub mod rpc;

pub use alloy::primitives::{Address, Bytes, TxHash, U256};
pub use error::{Error, Result};
