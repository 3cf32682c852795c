pub mod artifact;
pub mod block_utils;
pub mod client;
pub mod constants;
pub mod context;
pub mod contract;
pub mod error;
pub mod features_roles;
pub mod routines;
pub mod util;

pub use artifact::{Artifact, ArtifactStore};
pub use client::{ChainClient, RpcClient, RpcOptions, TxReceipt, TxRequest};
pub use context::DeployContext;
pub use contract::{Contract, ContractFactory};
pub use error::DeployError;

use clap::Parser;
use serde::{Deserialize, Serialize};
use util::target::Target;

/// Flags for specifying the node to deploy to.
#[derive(Debug, Default, Clone, Parser, Deserialize, Serialize)]
pub struct NodeTarget {
    /// The URL of the Ethereum JSON-RPC node the transactions are sent to.
    /// If unspecified, falls back to `http://127.0.0.1:8545`.
    ///
    /// You can also use `--target` to specify the node.
    #[clap(long, env = "ETH_NODE_URL")]
    pub node_url: Option<String>,

    /// Preset configurations for using a specific development node.
    ///
    /// You can also use `--node-url` to specify the node.
    ///
    /// Possible values are: [local, ganache]
    #[clap(long)]
    pub target: Option<Target>,
}

impl NodeTarget {
    /// Returns the URL to use for connecting to the node.
    pub fn get_node_url(&self) -> anyhow::Result<String> {
        let node_url = match (&self.target, &self.node_url) {
            (Some(_), Some(_)) => {
                anyhow::bail!("Only one of `--target` or `--node-url` should be specified")
            }
            (Some(target), None) => target.target_url(),
            (None, Some(node_url)) => node_url.clone(),
            (None, None) => constants::NODE_URL.to_string(),
        };
        Ok(node_url)
    }
}
