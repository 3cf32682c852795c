use super::{erc20::ali_erc20_deploy, link_or_deploy};
use crate::{
    constants::{ALI_ERC20, INTELLIGENT_NFT},
    context::DeployContext,
    contract::Contract,
    error::DeployError,
    util::encode::format_address,
};
use ethabi::{Address, Token};
use serde::Serialize;
use std::collections::BTreeMap;

/// The iNFT binder and the ALI token it locks.
#[derive(Debug, Clone, Serialize)]
pub struct IntelligentNft {
    pub ali: Contract,
    pub inft: Contract,
}

impl IntelligentNft {
    pub fn addresses(&self) -> BTreeMap<&'static str, Address> {
        BTreeMap::from([("ali", self.ali.address()), ("inft", self.inft.address())])
    }
}

/// Deploys the Intelligent NFT v2 binder.
///
/// Binds it to the ALI token at `ali` if given, deploys a new fully enabled token otherwise.
/// The binder itself is left with no features enabled.
pub async fn intelligent_nft_deploy(
    ctx: &DeployContext,
    a0: Address,
    ali: Option<Address>,
) -> Result<IntelligentNft, DeployError> {
    let ali = link_or_deploy(ctx, ALI_ERC20, ali, ali_erc20_deploy(ctx, a0, None)).await?;
    tracing::debug!("binding iNFT to ALI at {}", format_address(&ali.address()));
    let inft = ctx
        .require(INTELLIGENT_NFT)?
        .deploy(&[Token::Address(ali.address())], a0)
        .await?;
    Ok(IntelligentNft { ali, inft })
}
