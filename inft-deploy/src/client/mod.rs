//! The chain session the deployment routines submit transactions through.

mod rpc;

pub use rpc::{RpcClient, RpcOptions};

use crate::error::DeployError;
use async_trait::async_trait;
use ethabi::{Address, Hash, Uint};

/// A state-changing transaction, signed by the node on behalf of `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Address,
    /// `None` creates a contract from `data`.
    pub to: Option<Address>,
    pub data: Vec<u8>,
    pub value: Uint,
}

impl TxRequest {
    pub fn create(from: Address, init_code: Vec<u8>) -> Self {
        Self {
            from,
            to: None,
            data: init_code,
            value: Uint::zero(),
        }
    }

    pub fn call(from: Address, to: Address, data: Vec<u8>) -> Self {
        Self {
            from,
            to: Some(to),
            data,
            value: Uint::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: Hash,
    pub block_number: u64,
    /// `false` if the transaction was mined but reverted.
    pub status: bool,
    pub contract_address: Option<Address>,
    pub gas_used: Uint,
}

/// An already initialized connection to a chain with node-managed (unlocked) accounts.
///
/// Every method is awaited to completion before the routines issue the next one, so
/// implementations never see two transactions of the same routine in flight.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The accounts the node signs for.
    async fn accounts(&self) -> Result<Vec<Address>, DeployError>;

    /// Submits `tx` and waits until it is mined.
    async fn send_transaction(&self, tx: TxRequest) -> Result<TxReceipt, DeployError>;

    /// Executes a read-only call against the latest block and returns the raw output.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, DeployError>;

    /// Timestamp of the latest block, in seconds since the UNIX epoch.
    async fn latest_block_timestamp(&self) -> Result<u64, DeployError>;
}
