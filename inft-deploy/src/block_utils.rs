use crate::{client::ChainClient, error::DeployError};

/// A timestamp `offset` seconds after the latest block, usable as a sale start or a permit deadline.
/// Reads the chain clock, not the wall clock.
pub async fn default_deadline(client: &dyn ChainClient, offset: u64) -> Result<u64, DeployError> {
    let now = client.latest_block_timestamp().await?;
    Ok(now.saturating_add(offset))
}
