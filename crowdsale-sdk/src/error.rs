//! SDK error type.

use std::path::PathBuf;

use alloy::transports::TransportError;

use crate::abi::AbiError;
use crate::TxHash;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid node url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build the http client")]
    Client(#[source] reqwest::Error),
    #[error("{method} to {url} failed")]
    Transport {
        url: String,
        method: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("{method} failed with rpc error {code}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error("failed to read artifact {path}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {path} is unusable: {reason}")]
    BadArtifact { path: PathBuf, reason: String },
    #[error("no artifact for contract `{name}` under {root}")]
    ArtifactNotFound { name: String, root: PathBuf },
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("no receipt for {hash} after {secs}s")]
    ReceiptTimeout { hash: TxHash, secs: u64 },
    #[error("deployment transaction {0} created no contract")]
    NoContractAddress(TxHash),
    #[error("{method} returned unexpected data: {reason}")]
    UnexpectedReturn { method: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
