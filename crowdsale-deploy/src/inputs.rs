//! Externally authored input files.
//!
//! Required fields are checked for JavaScript-style truthiness before any
//! chain interaction: a missing field, `null`, `false`, `0` and `""` are all
//! rejected. That means `decimal: 0` and `rate: 0` are refused even though a
//! contract could accept them; existing input files rely on the check being
//! exactly this strict.

use crowdsale_sdk::contracts::PoolDefinition;
use crowdsale_sdk::Address;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::store::{AccountList, DataDir};

pub const TOKEN_FILE: &str = "gameloftToken.json";
pub const SALE_FILE: &str = "crowdsale.json";
pub const ROUNDS_FILE: &str = "round.json";
pub const INVESTORS_FILE: &str = "investor.json";

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fail with "invalid data" unless the document and every named field are
/// truthy.
pub fn require_truthy(file: &str, doc: &Value, fields: &[&str]) -> Result<()> {
    if !is_truthy(doc) {
        return Err(Error::InvalidConfig {
            file: file.to_string(),
            field: "<document>".to_string(),
        });
    }
    for field in fields {
        if !doc.get(field).is_some_and(is_truthy) {
            return Err(Error::InvalidConfig {
                file: file.to_string(),
                field: (*field).to_string(),
            });
        }
    }
    Ok(())
}

fn typed<T: DeserializeOwned>(file: &str, doc: Value) -> Result<T> {
    serde_json::from_value(doc).map_err(|e| Error::BadConfig {
        file: file.to_string(),
        reason: e.to_string(),
    })
}

/// `gameloftToken.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub initial_supply: Value,
    pub decimal: Value,
}

impl TokenConfig {
    pub fn from_document(doc: Value) -> Result<Self> {
        require_truthy(TOKEN_FILE, &doc, &["name", "symbol", "initialSupply", "decimal"])?;
        typed(TOKEN_FILE, doc)
    }

    pub async fn load(data: &DataDir) -> Result<Self> {
        Self::from_document(data.read_document(TOKEN_FILE).await?)
    }
}

/// `crowdsale.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleConfig {
    pub rate: Value,
}

impl SaleConfig {
    pub fn from_document(doc: Value) -> Result<Self> {
        require_truthy(SALE_FILE, &doc, &["rate"])?;
        typed(SALE_FILE, doc)
    }

    pub async fn load(data: &DataDir) -> Result<Self> {
        Self::from_document(data.read_document(SALE_FILE).await?)
    }
}

/// `round.json`: pool definitions in registration order.
pub fn rounds_from_document(doc: Value) -> Result<Vec<PoolDefinition>> {
    if !doc.is_array() {
        return Err(Error::BadConfig {
            file: ROUNDS_FILE.to_string(),
            reason: "expected an array of pool definitions".to_string(),
        });
    }
    typed(ROUNDS_FILE, doc)
}

pub async fn load_rounds(data: &DataDir) -> Result<Vec<PoolDefinition>> {
    rounds_from_document(data.read_document(ROUNDS_FILE).await?)
}

/// An investor given either by position in `account.json` or literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvestorRef {
    Index(usize),
    Address(Address),
}

/// `investor.json`: which accounts to flag for which round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorConfig {
    pub round_id: Value,
    pub investors: Vec<InvestorRef>,
}

impl InvestorConfig {
    /// Name of the built-in policy used when no `investor.json` exists.
    pub const ROUND_ONE: &'static str = "round-one";

    /// Round "1", accounts 1 and 2.
    pub fn round_one() -> Self {
        Self {
            round_id: json!("1"),
            investors: vec![InvestorRef::Index(1), InvestorRef::Index(2)],
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            Self::ROUND_ONE => Some(Self::round_one()),
            _ => None,
        }
    }

    pub fn from_document(doc: Value) -> Result<Self> {
        require_truthy(INVESTORS_FILE, &doc, &["roundId", "investors"])?;
        typed(INVESTORS_FILE, doc)
    }

    /// `investor.json` if present, otherwise the named preset.
    pub async fn load_or_preset(data: &DataDir, preset: &str) -> Result<Self> {
        if data.exists(INVESTORS_FILE) {
            return Self::from_document(data.read_document(INVESTORS_FILE).await?);
        }
        Self::preset(preset).ok_or_else(|| Error::BadConfig {
            file: INVESTORS_FILE.to_string(),
            reason: format!("file absent and `{preset}` is not a known preset"),
        })
    }

    pub fn needs_accounts(&self) -> bool {
        self.investors
            .iter()
            .any(|i| matches!(i, InvestorRef::Index(_)))
    }

    /// Resolve every reference to an address.
    pub fn resolve(&self, accounts: &AccountList) -> Result<Vec<Address>> {
        self.investors
            .iter()
            .map(|investor| match investor {
                InvestorRef::Address(address) => Ok(*address),
                InvestorRef::Index(index) => accounts.get(*index).ok_or_else(|| Error::BadConfig {
                    file: INVESTORS_FILE.to_string(),
                    reason: format!(
                        "account index {index} out of range ({} accounts recorded)",
                        accounts.len()
                    ),
                }),
            })
            .collect()
    }

    /// Round id for log lines.
    pub fn round_label(&self) -> String {
        match &self.round_id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
