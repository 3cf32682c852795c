/// Default to localhost to favour the common case of testing against a Hardhat or Anvil node.
pub const NODE_URL: &str = "http://127.0.0.1:8545";
pub const GANACHE_NODE_URL: &str = "http://127.0.0.1:7545";

/// Directory artifacts are read from when `INFT_ARTIFACTS_DIR` is not set (Truffle's output dir).
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";
pub const ARTIFACTS_DIR_ENV: &str = "INFT_ARTIFACTS_DIR";

/// The maximum time to wait for a transaction to be included in a block by the node
pub const TX_RECEIPT_TIMEOUT_MS: u64 = 30_000u64;
/// Delay between two `eth_getTransactionReceipt` polls
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 100u64;

// Artifact names of the deployable contracts.
pub const ALI_ERC20: &str = "AliERC20v2";
pub const WHITELABEL_NFT: &str = "WhitelabelNFT";
pub const PERSONALITY_POD: &str = "PersonalityPodERC721";
pub const ALI_NFT: &str = "ALINFT";
pub const INTELLIGENT_NFT: &str = "IntelligentNFTv2";
pub const FIXED_SUPPLY_SALE: &str = "FixedSupplySaleMock";
pub const MINTABLE_SALE: &str = "MintableSaleMock";
pub const OPENSEA_FACTORY: &str = "OpenSeaFactoryImpl";
pub const ERC721_DROP: &str = "ERC721Drop";
