//! An in-memory chain that understands the fixture artifacts: it decodes constructor and call data
//! with their ABIs and keeps the access-control state the deployment routines touch.

#![allow(dead_code)]

use async_trait::async_trait;
use ethabi::{Address, Hash, Token, Uint};
use inft_deploy::{
    Artifact, ArtifactStore, ChainClient, DeployContext, DeployError, TxReceipt, TxRequest,
};
use inft_tracing::{init_tracing_subscriber, TracingSubscriberOptions};
use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

const FIXTURE_CONTRACTS: [&str; 9] = [
    "AliERC20v2",
    "WhitelabelNFT",
    "PersonalityPodERC721",
    "ALINFT",
    "IntelligentNFTv2",
    "FixedSupplySaleMock",
    "MintableSaleMock",
    "OpenSeaFactoryImpl",
    "ERC721Drop",
];

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("artifacts")
}

/// A fresh chain and a context deploying the fixture artifacts to it, plus the super admin.
pub fn setup() -> (DeployContext, Arc<MockChain>, Address) {
    init_tracing_subscriber(TracingSubscriberOptions::for_tests());
    let store = ArtifactStore::new(fixtures_dir());
    let chain = Arc::new(MockChain::new(&store));
    let a0 = chain.accounts[0];
    let ctx = DeployContext::new(store, chain.clone());
    (ctx, chain, a0)
}

#[derive(Debug, Clone)]
pub struct Deployed {
    pub name: String,
    pub deployer: Address,
    pub ctor_args: Vec<Token>,
    pub features: Uint,
    pub roles: HashMap<Address, Uint>,
    pub initialized: Option<Vec<Token>>,
}

#[derive(Debug, Default)]
struct State {
    contracts: BTreeMap<Address, Deployed>,
    tx_count: u64,
    block_number: u64,
    timestamp: u64,
    /// `(contract name, method)` pairs whose transactions are mined with a failed status.
    reverts: Vec<(String, String)>,
}

pub struct MockChain {
    pub accounts: Vec<Address>,
    artifacts: Vec<Artifact>,
    state: Mutex<State>,
}

impl MockChain {
    pub fn new(store: &ArtifactStore) -> Self {
        let artifacts = FIXTURE_CONTRACTS
            .iter()
            .map(|name| store.require(name).unwrap())
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Self {
            accounts: (1..=10).map(|i| Address::from_low_u64_be(0xa0 + i)).collect(),
            artifacts,
            state: Mutex::new(State {
                timestamp,
                ..State::default()
            }),
        }
    }

    /// Mines every later `method` transaction to `contract` as reverted. `"constructor"` fails
    /// the deployment itself.
    pub fn revert_on(&self, contract: &str, method: &str) {
        self.state
            .lock()
            .unwrap()
            .reverts
            .push((contract.to_string(), method.to_string()));
    }

    pub fn tx_count(&self) -> u64 {
        self.state.lock().unwrap().tx_count
    }

    pub fn contract_count(&self) -> usize {
        self.state.lock().unwrap().contracts.len()
    }

    pub fn now(&self) -> u64 {
        self.state.lock().unwrap().timestamp
    }

    pub fn deployed(&self, address: Address) -> Deployed {
        self.state.lock().unwrap().contracts[&address].clone()
    }

    pub fn count_of(&self, name: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.contracts.values().filter(|c| c.name == name).count()
    }

    pub fn features_of(&self, address: Address) -> Uint {
        self.deployed(address).features
    }

    pub fn role_of(&self, address: Address, operator: Address) -> Uint {
        self.deployed(address)
            .roles
            .get(&operator)
            .copied()
            .unwrap_or_default()
    }

    fn artifact_for_init_code(&self, init_code: &[u8]) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| init_code.starts_with(&a.bytecode))
    }

    fn artifact_named(&self, name: &str) -> &Artifact {
        self.artifacts
            .iter()
            .find(|a| a.contract_name == name)
            .unwrap()
    }

    fn function<'a>(
        artifact: &'a Artifact,
        data: &[u8],
    ) -> Result<&'a ethabi::Function, DeployError> {
        if data.len() < 4 {
            return Err(rpc_error("call data too short"));
        }
        artifact
            .abi
            .functions()
            .find(|f| f.short_signature()[..] == data[..4])
            .ok_or_else(|| rpc_error("unknown selector"))
    }

    fn create(&self, state: &mut State, tx: &TxRequest) -> Result<Option<Address>, DeployError> {
        let artifact = self
            .artifact_for_init_code(&tx.data)
            .ok_or_else(|| rpc_error("unknown init code"))?;
        let params: Vec<_> = artifact
            .abi
            .constructor()
            .map(|c| c.inputs.iter().map(|p| p.kind.clone()).collect())
            .unwrap_or_default();
        let ctor_args = ethabi::decode(&params, &tx.data[artifact.bytecode.len()..])
            .map_err(|e| rpc_error(&e.to_string()))?;
        if is_reverting(state, &artifact.contract_name, "constructor") {
            return Ok(None);
        }
        let address = Address::from_low_u64_be(0x1000 + state.contracts.len() as u64);
        state.contracts.insert(
            address,
            Deployed {
                name: artifact.contract_name.clone(),
                deployer: tx.from,
                ctor_args,
                features: Uint::zero(),
                roles: HashMap::new(),
                initialized: None,
            },
        );
        Ok(Some(address))
    }

    fn execute(&self, state: &mut State, to: Address, tx: &TxRequest) -> Result<bool, DeployError> {
        let contract = state
            .contracts
            .get(&to)
            .ok_or_else(|| rpc_error("no contract at address"))?;
        let function = Self::function(self.artifact_named(&contract.name), &tx.data)?;
        let args = function
            .decode_input(&tx.data[4..])
            .map_err(|e| rpc_error(&e.to_string()))?;
        if is_reverting(state, &contract.name, &function.name) {
            return Ok(false);
        }
        let contract = state.contracts.get_mut(&to).unwrap();
        match (function.name.as_str(), args.as_slice()) {
            ("updateFeatures", [Token::Uint(mask)]) => contract.features = *mask,
            ("updateRole", [Token::Address(operator), Token::Uint(role)]) => {
                contract.roles.insert(*operator, *role);
            }
            ("initialize", _) => contract.initialized = Some(args.clone()),
            _ => {}
        }
        Ok(true)
    }
}

fn is_reverting(state: &State, contract: &str, method: &str) -> bool {
    state
        .reverts
        .iter()
        .any(|(c, m)| c == contract && m == method)
}

fn rpc_error(message: &str) -> DeployError {
    DeployError::Rpc {
        code: -32000,
        message: message.to_string(),
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn accounts(&self) -> Result<Vec<Address>, DeployError> {
        Ok(self.accounts.clone())
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<TxReceipt, DeployError> {
        let mut state = self.state.lock().unwrap();
        let (status, contract_address) = match tx.to {
            None => {
                let address = self.create(&mut state, &tx)?;
                (address.is_some(), address)
            }
            Some(to) => (self.execute(&mut state, to, &tx)?, None),
        };
        state.tx_count += 1;
        state.block_number += 1;
        state.timestamp += 1;
        Ok(TxReceipt {
            tx_hash: Hash::from_low_u64_be(state.tx_count),
            block_number: state.block_number,
            status,
            contract_address,
            gas_used: Uint::from(21_000u64),
        })
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, DeployError> {
        let state = self.state.lock().unwrap();
        let contract = state
            .contracts
            .get(&to)
            .ok_or_else(|| rpc_error("no contract at address"))?;
        let function = Self::function(self.artifact_named(&contract.name), &data)?;
        let args = function
            .decode_input(&data[4..])
            .map_err(|e| rpc_error(&e.to_string()))?;
        let role = |operator: &Address| contract.roles.get(operator).copied().unwrap_or_default();
        let output = match (function.name.as_str(), args.as_slice()) {
            ("features", []) => Token::Uint(contract.features),
            ("isFeatureEnabled", [Token::Uint(required)]) => {
                Token::Bool(contract.features & *required == *required)
            }
            ("userRoles", [Token::Address(operator)]) => Token::Uint(role(operator)),
            ("isOperatorInRole", [Token::Address(operator), Token::Uint(required)]) => {
                Token::Bool(role(operator) & *required == *required)
            }
            ("aliContract", []) => contract.ctor_args[0].clone(),
            (name, _) => return Err(rpc_error(&format!("{name} is not a view"))),
        };
        Ok(ethabi::encode(&[output]))
    }

    async fn latest_block_timestamp(&self) -> Result<u64, DeployError> {
        Ok(self.state.lock().unwrap().timestamp)
    }
}
