//! Feature and role identifiers shared by the access-controlled protocol contracts.
//!
//! Features and roles live in the same 256-bit permission space: the lower 16 bits are features
//! (set on the contract itself via `updateFeatures`), the upper bits are roles (set per operator via
//! `updateRole`). The routines forward these values without interpreting them.

use ethabi::{ethereum_types::U256, Uint};

/// No features enabled, the state of every freshly deployed contract.
pub const FEATURE_NONE: Uint = U256([0, 0, 0, 0]);

/// Enables ERC20/ERC721 transfers of the tokens
pub const FEATURE_TRANSFERS: Uint = U256([0x0000_0001, 0, 0, 0]);
/// Enables transfers on behalf (`transferFrom`)
pub const FEATURE_TRANSFERS_ON_BEHALF: Uint = U256([0x0000_0002, 0, 0, 0]);
/// Enables burning own tokens
pub const FEATURE_OWN_BURNS: Uint = U256([0x0000_0008, 0, 0, 0]);
/// Enables burning tokens on behalf
pub const FEATURE_BURNS_ON_BEHALF: Uint = U256([0x0000_0010, 0, 0, 0]);

/// Every feature bit a protocol contract defines.
pub const FEATURE_ALL: Uint = U256([0x0000_FFFF, 0, 0, 0]);

/// Allows minting tokens (ERC20/ERC721 `mint`, sales and drops minting on behalf of the collection)
pub const ROLE_TOKEN_CREATOR: Uint = U256([0x0001_0000, 0, 0, 0]);
/// Allows burning tokens of other holders
pub const ROLE_TOKEN_DESTROYER: Uint = U256([0x0002_0000, 0, 0, 0]);

/// Allows minting iNFTs, i.e. binding a personality pod and ALI tokens to a target NFT
pub const ROLE_MINTER: Uint = U256([0x0001_0000, 0, 0, 0]);
/// Allows burning iNFTs
pub const ROLE_BURNER: Uint = U256([0x0002_0000, 0, 0, 0]);

/// Allows changing features and roles; the highest bit of the permission space
pub const ROLE_ACCESS_MANAGER: Uint = U256([0, 0, 0, 0x8000_0000_0000_0000]);
