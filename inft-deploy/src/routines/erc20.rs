use super::enable_all_features;
use crate::{
    constants::ALI_ERC20, context::DeployContext, contract::Contract, error::DeployError,
};
use ethabi::{Address, Token};

/// Deploys the ALI ERC20 token with all the features enabled.
///
/// `h0` receives the initial supply and defaults to the owner `a0`.
pub async fn ali_erc20_deploy(
    ctx: &DeployContext,
    a0: Address,
    h0: Option<Address>,
) -> Result<Contract, DeployError> {
    let token = ali_erc20_deploy_restricted(ctx, a0, h0).await?;
    enable_all_features(&token, a0).await?;
    Ok(token)
}

/// Deploys the ALI ERC20 token with no features enabled.
pub async fn ali_erc20_deploy_restricted(
    ctx: &DeployContext,
    a0: Address,
    h0: Option<Address>,
) -> Result<Contract, DeployError> {
    let holder = h0.unwrap_or(a0);
    ctx.require(ALI_ERC20)?
        .deploy(&[Token::Address(holder)], a0)
        .await
}
