//! Typed wrappers for the two contracts the workflow drives.
//!
//! The wrappers only name methods and convert return values; all contract
//! semantics live on-chain.

mod crowdsale;
mod token;

pub use crowdsale::{CrowdSale, PoolDefinition};
pub use token::GameloftToken;

use serde_json::Value;

use crate::abi::DynSolValue;
use crate::error::{Error, Result};
use crate::{Address, U256};

/// Addresses go over the JSON boundary checksummed.
fn address_arg(address: Address) -> Value {
    Value::String(address.to_checksum(None))
}

fn amount_arg(amount: U256) -> Value {
    Value::String(amount.to_string())
}

fn single(values: Vec<DynSolValue>, method: &str) -> Result<DynSolValue> {
    let mut values = values.into_iter();
    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(Error::UnexpectedReturn {
            method: method.to_string(),
            reason: "expected exactly one return value".to_string(),
        }),
    }
}

fn mismatch(method: &str, expected: &str) -> Error {
    Error::UnexpectedReturn {
        method: method.to_string(),
        reason: format!("expected {expected}"),
    }
}

pub(crate) fn expect_uint(values: Vec<DynSolValue>, method: &str) -> Result<U256> {
    single(values, method)?
        .as_uint()
        .map(|(n, _)| n)
        .ok_or_else(|| mismatch(method, "uint"))
}

pub(crate) fn expect_string(values: Vec<DynSolValue>, method: &str) -> Result<String> {
    single(values, method)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| mismatch(method, "string"))
}

pub(crate) fn expect_address(values: Vec<DynSolValue>, method: &str) -> Result<Address> {
    single(values, method)?
        .as_address()
        .ok_or_else(|| mismatch(method, "address"))
}
