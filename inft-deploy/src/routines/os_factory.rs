use crate::{
    constants::OPENSEA_FACTORY, context::DeployContext, contract::Contract, error::DeployError,
};
use ethabi::{Address, Token, Uint};

/// Deploys the OpenSea factory minting Personality Pods at `persona` through `proxy_registry`.
///
/// `range_bounds` splits the token ID space into the options the factory lists.
pub async fn os_factory_deploy_pure(
    ctx: &DeployContext,
    a0: Address,
    range_bounds: &[u32],
    persona: Address,
    proxy_registry: Address,
) -> Result<Contract, DeployError> {
    let bounds = range_bounds
        .iter()
        .map(|&bound| Token::Uint(Uint::from(bound)))
        .collect();
    let args = [
        Token::Address(persona),
        Token::Address(proxy_registry),
        Token::Array(bounds),
    ];
    ctx.require(OPENSEA_FACTORY)?.deploy(&args, a0).await
}
