use crate::{
    artifact::ArtifactStore,
    client::{ChainClient, RpcClient, RpcOptions},
    contract::ContractFactory,
    error::DeployError,
    NodeTarget,
};
use ethabi::Address;
use std::{fmt, sync::Arc};

/// Everything the deployment routines need from their environment: where the compiled contracts
/// live and which chain to deploy them to.
///
/// Built once per test run and passed to every routine.
#[derive(Clone)]
pub struct DeployContext {
    artifacts: ArtifactStore,
    client: Arc<dyn ChainClient>,
}

impl DeployContext {
    pub fn new(artifacts: ArtifactStore, client: Arc<dyn ChainClient>) -> Self {
        Self { artifacts, client }
    }

    /// Connects to the JSON-RPC node selected by `node`.
    pub fn connect(node: &NodeTarget, artifacts: ArtifactStore) -> anyhow::Result<Self> {
        let node_url = node.get_node_url()?;
        let client = RpcClient::new(&node_url, RpcOptions::default())?;
        tracing::debug!(
            "deploying to {node_url} from artifacts in {}",
            artifacts.dir().display()
        );
        Ok(Self::new(artifacts, Arc::new(client)))
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    /// Resolves a contract by name, e.g. `ctx.require("./AliERC20v2")`.
    pub fn require(&self, name: &str) -> Result<ContractFactory, DeployError> {
        let artifact = self.artifacts.require(name)?;
        Ok(ContractFactory::new(Arc::new(artifact), self.client.clone()))
    }

    /// The accounts the node signs for; by convention the first one is the super admin.
    pub async fn accounts(&self) -> Result<Vec<Address>, DeployError> {
        self.client.accounts().await
    }
}

impl fmt::Debug for DeployContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployContext")
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}
