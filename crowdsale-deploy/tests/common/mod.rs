//! In-memory node for workflow tests.
//!
//! Decodes calldata with the fixture artifacts' ABIs and keeps a toy model
//! of the two contracts: ERC-20 style balances for the token, pools and
//! investor flags for the sale. Purchase pricing is a stand-in, not the
//! contract's: a purchase moves `ratios[0]` (or the requested amount) from
//! the sale's token balance to the beneficiary and credits `amount / rate`
//! to the collector.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crowdsale_deploy::stages::{Context, StageOptions};
use crowdsale_deploy::store::DataDir;
use crowdsale_sdk::abi::{self, DynSolValue};
use crowdsale_sdk::artifact::{Artifact, Artifacts};
use crowdsale_sdk::chain::{Chain, Receipt, TransactionRequest};
use crowdsale_sdk::{Address, Bytes, Error, Result, TxHash, U256};
use serde_json::{json, Value};

pub fn artifacts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/artifacts")
}

fn fixture(name: &str) -> Artifact {
    let path = artifacts_dir().join(format!("{name}.json"));
    let text = std::fs::read_to_string(&path).unwrap();
    Artifact::parse(name, &path, &text).unwrap()
}

/// Node account `n` (1-based): 0x00..0n.
pub fn account(n: u8) -> Address {
    Address::with_last_byte(n)
}

/// One transaction as the node saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SentTx {
    pub from: Address,
    pub to: Option<Address>,
    /// Function name, or `create:<Contract>` for deployments.
    pub method: String,
    /// Decoded call arguments; empty for deployments.
    pub args: Vec<DynSolValue>,
    pub reverted: bool,
}

impl SentTx {
    /// Argument `i` as a string, for round ids.
    pub fn string_arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).and_then(DynSolValue::as_str)
    }
}

struct TokenState {
    name: String,
    symbol: String,
    decimals: U256,
    total_supply: U256,
    balances: HashMap<Address, U256>,
}

struct Pool {
    id: String,
    ratios: Vec<U256>,
}

struct SaleState {
    owner: Address,
    token: Address,
    collector: Address,
    rate: U256,
    pools: Vec<Pool>,
    investors: HashSet<(String, Address)>,
    balances: HashMap<Address, U256>,
}

enum Deployed {
    Token(TokenState),
    Sale(SaleState),
}

struct Node {
    accounts: Vec<Address>,
    token: Artifact,
    sale: Artifact,
    contracts: HashMap<Address, Deployed>,
    receipts: HashMap<TxHash, Receipt>,
    sent: Vec<SentTx>,
    interactions: usize,
    fail_at: Option<usize>,
    next_contract: u64,
}

type Outcome = std::result::Result<Option<Address>, String>;

/// The function whose selector prefixes `data`, with its decoded arguments.
fn decode_call(artifact: &Artifact, data: &[u8]) -> std::result::Result<(String, Vec<DynSolValue>), String> {
    if data.len() < 4 {
        return Err("calldata too short".into());
    }
    let function = artifact
        .abi
        .functions()
        .find(|f| f.selector()[..] == data[..4])
        .ok_or("unknown selector")?;
    let args = abi::decode_params(&function.inputs, &data[4..]).map_err(|e| e.to_string())?;
    Ok((function.name.clone(), args))
}

fn constructor_args(artifact: &Artifact, data: &[u8]) -> std::result::Result<Vec<DynSolValue>, String> {
    let params = artifact
        .abi
        .constructor()
        .map(|c| c.inputs.as_slice())
        .unwrap_or_default();
    abi::decode_params(params, &data[artifact.bytecode.len()..]).map_err(|e| e.to_string())
}

fn string(values: &[DynSolValue], i: usize) -> String {
    values[i].as_str().unwrap_or_default().to_string()
}

fn uint(values: &[DynSolValue], i: usize) -> U256 {
    values[i].as_uint().map(|(n, _)| n).unwrap_or_default()
}

fn address(values: &[DynSolValue], i: usize) -> Address {
    values[i].as_address().unwrap_or_default()
}

fn uints(values: &[DynSolValue], i: usize) -> Vec<U256> {
    values[i]
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_uint().map(|(n, _)| n)).collect())
        .unwrap_or_default()
}

fn tx_hash(n: usize) -> TxHash {
    let mut raw = [0u8; 32];
    raw[0] = 0xee;
    raw[24..].copy_from_slice(&(n as u64).to_be_bytes());
    TxHash::from(raw)
}

/// ABI-encode a single return value.
fn returns(value: DynSolValue) -> Bytes {
    DynSolValue::Tuple(vec![value]).abi_encode_params().into()
}

impl Node {
    /// Method name and decoded arguments, as far as the node can tell.
    fn describe(&self, tx: &TransactionRequest) -> (String, Vec<DynSolValue>) {
        match tx.to {
            None if tx.data.starts_with(&self.token.bytecode[..]) => {
                (format!("create:{}", self.token.contract_name), Vec::new())
            }
            None if tx.data.starts_with(&self.sale.bytecode[..]) => {
                (format!("create:{}", self.sale.contract_name), Vec::new())
            }
            None => ("create:?".to_string(), Vec::new()),
            Some(to) => {
                let decoded = match self.contracts.get(&to) {
                    Some(Deployed::Token(_)) => decode_call(&self.token, &tx.data).ok(),
                    Some(Deployed::Sale(_)) => decode_call(&self.sale, &tx.data).ok(),
                    None => None,
                };
                decoded.unwrap_or_else(|| ("?".to_string(), Vec::new()))
            }
        }
    }

    fn create(&mut self, from: Address, data: &[u8]) -> Outcome {
        self.next_contract += 1;
        let mut raw = [0u8; 20];
        raw[0] = 0xc0;
        raw[12..].copy_from_slice(&self.next_contract.to_be_bytes());
        let created = Address::from(raw);

        let deployed = if data.starts_with(&self.token.bytecode[..]) {
            let args = constructor_args(&self.token, data)?;
            let decimals = uint(&args, 4);
            let total_supply = uint(&args, 3) * U256::from(10).pow(decimals);
            let mut balances = HashMap::new();
            balances.insert(address(&args, 2), total_supply);
            Deployed::Token(TokenState {
                name: string(&args, 0),
                symbol: string(&args, 1),
                decimals,
                total_supply,
                balances,
            })
        } else if data.starts_with(&self.sale.bytecode[..]) {
            let args = constructor_args(&self.sale, data)?;
            Deployed::Sale(SaleState {
                owner: from,
                token: address(&args, 0),
                collector: address(&args, 1),
                rate: uint(&args, 2),
                pools: Vec::new(),
                investors: HashSet::new(),
                balances: HashMap::new(),
            })
        } else {
            return Err("unknown bytecode".into());
        };
        self.contracts.insert(created, deployed);
        Ok(Some(created))
    }

    fn invoke(&mut self, from: Address, to: Address, data: &[u8]) -> Outcome {
        match self.contracts.get(&to) {
            Some(Deployed::Token(_)) => {
                let (method, args) = decode_call(&self.token, data)?;
                match method.as_str() {
                    "transfer" => {
                        self.move_tokens(to, from, address(&args, 0), uint(&args, 1))?;
                        Ok(None)
                    }
                    other => Err(format!("{other} is not a transaction")),
                }
            }
            Some(Deployed::Sale(_)) => {
                let (method, args) = decode_call(&self.sale, data)?;
                self.sale_transaction(to, from, &method, &args)?;
                Ok(None)
            }
            None => Err("no contract at address".into()),
        }
    }

    fn move_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<(), String> {
        let Some(Deployed::Token(state)) = self.contracts.get_mut(&token) else {
            return Err("not a token".into());
        };
        let balance = state.balances.get(&from).copied().unwrap_or_default();
        if balance < amount {
            return Err("transfer amount exceeds balance".into());
        }
        state.balances.insert(from, balance - amount);
        *state.balances.entry(to).or_default() += amount;
        Ok(())
    }

    fn sale_transaction(
        &mut self,
        sale: Address,
        from: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> std::result::Result<(), String> {
        let Some(Deployed::Sale(state)) = self.contracts.get_mut(&sale) else {
            return Err("not a sale".into());
        };
        match method {
            "createPool" => {
                if from != state.owner {
                    return Err("caller is not the owner".into());
                }
                let id = string(args, 0);
                if state.pools.iter().any(|p| p.id == id) {
                    return Err(format!("pool {id} already exists"));
                }
                state.pools.push(Pool {
                    id,
                    ratios: uints(args, 4),
                });
                Ok(())
            }
            "setInvestor" => {
                if from != state.owner {
                    return Err("caller is not the owner".into());
                }
                let key = (string(args, 0), address(args, 1));
                if args[2].as_bool().unwrap_or(false) {
                    state.investors.insert(key);
                } else {
                    state.investors.remove(&key);
                }
                Ok(())
            }
            "buyToken" | "buySpecificAmountOfToken" => {
                let round = string(args, 0);
                if !state.investors.contains(&(round.clone(), from)) {
                    return Err("caller is not an investor".into());
                }
                let pool = state
                    .pools
                    .iter()
                    .find(|p| p.id == round)
                    .ok_or("unknown pool")?;
                let amount = if method == "buyToken" {
                    pool.ratios.first().copied().unwrap_or_default()
                } else {
                    uint(args, 2)
                };
                if state.rate.is_zero() {
                    return Err("rate is zero".into());
                }
                let credit = amount / state.rate;
                let (token, collector) = (state.token, state.collector);
                self.move_tokens(token, sale, address(args, 1), amount)?;
                if let Some(Deployed::Sale(state)) = self.contracts.get_mut(&sale) {
                    *state.balances.entry(collector).or_default() += credit;
                }
                Ok(())
            }
            other => Err(format!("{other} is not a transaction")),
        }
    }

    fn view(&self, tx: &TransactionRequest) -> std::result::Result<DynSolValue, String> {
        let to = tx.to.ok_or("call without target")?;
        let uint = |n: U256| DynSolValue::Uint(n, 256);
        let balance = |balances: &HashMap<Address, U256>, args: &[DynSolValue]| {
            balances.get(&address(args, 0)).copied().unwrap_or_default()
        };
        match self.contracts.get(&to) {
            Some(Deployed::Token(state)) => {
                let (method, args) = decode_call(&self.token, &tx.data)?;
                match method.as_str() {
                    "name" => Ok(DynSolValue::String(state.name.clone())),
                    "symbol" => Ok(DynSolValue::String(state.symbol.clone())),
                    "decimals" => Ok(DynSolValue::Uint(state.decimals, 8)),
                    "totalSupply" => Ok(uint(state.total_supply)),
                    "balanceOf" => Ok(uint(balance(&state.balances, &args))),
                    other => Err(format!("{other} is not a view")),
                }
            }
            Some(Deployed::Sale(state)) => {
                let (method, args) = decode_call(&self.sale, &tx.data)?;
                match method.as_str() {
                    "rate" => Ok(uint(state.rate)),
                    "token" => Ok(DynSolValue::Address(state.token)),
                    "balanceOf" => Ok(uint(balance(&state.balances, &args))),
                    other => Err(format!("{other} is not a view")),
                }
            }
            None => Err("no contract at address".into()),
        }
    }
}

/// Cloneable handle; clones share one node.
#[derive(Clone)]
pub struct MockChain {
    inner: Arc<Mutex<Node>>,
}

impl fmt::Debug for MockChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockChain").finish_non_exhaustive()
    }
}

impl MockChain {
    /// A node exposing accounts 0x..01 through 0x..`count`.
    pub fn with_accounts(count: u8) -> Self {
        let node = Node {
            accounts: (1..=count).map(account).collect(),
            token: fixture("GameloftToken"),
            sale: fixture("CrowdSale"),
            contracts: HashMap::new(),
            receipts: HashMap::new(),
            sent: Vec::new(),
            interactions: 0,
            fail_at: None,
            next_contract: 0,
        };
        Self {
            inner: Arc::new(Mutex::new(node)),
        }
    }

    pub fn new() -> Self {
        Self::with_accounts(10)
    }

    /// Make the `n`th transaction from now (1-based) revert.
    pub fn fail_send(&self, n: usize) {
        let mut node = self.inner.lock().unwrap();
        node.fail_at = Some(node.sent.len() + n);
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Names of the methods sent, in order.
    pub fn methods(&self) -> Vec<String> {
        self.sent().into_iter().map(|tx| tx.method).collect()
    }

    /// The most recent transaction.
    pub fn last_sent(&self) -> SentTx {
        self.sent().pop().unwrap()
    }

    /// Every accounts / send / call request so far.
    pub fn interactions(&self) -> usize {
        self.inner.lock().unwrap().interactions
    }

    pub fn pool_ids(&self, sale: Address) -> Vec<String> {
        match self.inner.lock().unwrap().contracts.get(&sale) {
            Some(Deployed::Sale(state)) => state.pools.iter().map(|p| p.id.clone()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_investor(&self, sale: Address, round: &str, investor: Address) -> bool {
        match self.inner.lock().unwrap().contracts.get(&sale) {
            Some(Deployed::Sale(state)) => state
                .investors
                .contains(&(round.to_string(), investor)),
            _ => false,
        }
    }

    pub fn investor_count(&self, sale: Address) -> usize {
        match self.inner.lock().unwrap().contracts.get(&sale) {
            Some(Deployed::Sale(state)) => state.investors.len(),
            _ => 0,
        }
    }

    pub fn token_balance(&self, token: Address, holder: Address) -> U256 {
        match self.inner.lock().unwrap().contracts.get(&token) {
            Some(Deployed::Token(state)) => {
                state.balances.get(&holder).copied().unwrap_or_default()
            }
            _ => U256::ZERO,
        }
    }
}

impl Chain for MockChain {
    async fn accounts(&self) -> Result<Vec<Address>> {
        let mut node = self.inner.lock().unwrap();
        node.interactions += 1;
        Ok(node.accounts.clone())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash> {
        let mut node = self.inner.lock().unwrap();
        node.interactions += 1;
        let from = tx.from.unwrap_or(node.accounts[0]);
        let (method, args) = node.describe(tx);
        let index = node.sent.len() + 1;
        let hash = tx_hash(index);

        let outcome = if node.fail_at == Some(index) {
            Err("injected failure".to_string())
        } else {
            match tx.to {
                None => node.create(from, &tx.data),
                Some(to) => node.invoke(from, to, &tx.data),
            }
        };
        let reverted = outcome.is_err();
        node.sent.push(SentTx {
            from,
            to: tx.to,
            method,
            args,
            reverted,
        });
        node.receipts.insert(
            hash,
            Receipt {
                transaction_hash: hash,
                contract_address: outcome.unwrap_or(None),
                status: !reverted,
                block_number: Some(index as u64),
            },
        );
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt> {
        let node = self.inner.lock().unwrap();
        node.receipts
            .get(&hash)
            .cloned()
            .ok_or(Error::ReceiptTimeout { hash, secs: 0 })
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        let mut node = self.inner.lock().unwrap();
        node.interactions += 1;
        match node.view(tx) {
            Ok(value) => Ok(returns(value)),
            Err(message) => Err(Error::Rpc {
                method: "eth_call".to_string(),
                code: 3,
                message,
            }),
        }
    }
}

// ── Workspace helpers ──────────────────────────────────────────────────

/// A data directory populated with the standard inputs.
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub data: DataDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::new(dir.path());
        Self { dir, data }
    }

    /// Standard token, sale and round inputs.
    pub fn with_inputs() -> Self {
        let ws = Self::new();
        ws.write("gameloftToken.json", &token_input());
        ws.write("crowdsale.json", &json!({"rate": 2}));
        ws.write("round.json", &rounds_input());
        ws
    }

    pub fn write(&self, file: &str, value: &Value) {
        std::fs::write(self.dir.path().join(file), value.to_string()).unwrap();
    }

    pub fn read(&self, file: &str) -> Value {
        let text = std::fs::read_to_string(self.dir.path().join(file)).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    pub fn context(&self, chain: MockChain) -> Context<MockChain> {
        Context::new(
            chain,
            self.data.clone(),
            Artifacts::new(artifacts_dir()),
            StageOptions::default(),
        )
    }
}

pub fn token_input() -> Value {
    json!({"name": "GL", "symbol": "GL", "initialSupply": 1000000, "decimal": 18})
}

/// Three pools, deliberately not in id order.
pub fn rounds_input() -> Value {
    json!([
        {"poolId": "1", "name": "Seed", "totalPercent": 10,
         "timestamps": [1700000000, 1710000000], "ratios": [200000, 800000]},
        {"poolId": "3", "name": "Public", "totalPercent": 50,
         "timestamps": [1720000000], "ratios": [1000000]},
        {"poolId": "2", "name": "Private", "totalPercent": 40,
         "timestamps": [1710000000], "ratios": [500000, 500000]}
    ])
}
