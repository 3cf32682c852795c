use super::enable_all_features;
use crate::{
    constants::{ALI_NFT, PERSONALITY_POD, WHITELABEL_NFT},
    context::DeployContext,
    contract::Contract,
    error::DeployError,
};
use ethabi::{Address, Token};
use serde::Serialize;

/// ERC721 collection name and symbol, passed to the token constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMeta {
    pub name: String,
    pub symbol: String,
}

impl TokenMeta {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    pub fn whitelabel() -> Self {
        Self::new("Whitelabel NFT", "WFT")
    }

    pub fn persona() -> Self {
        Self::new("iNFT Personality Pod", "POD")
    }

    pub fn ali_nft() -> Self {
        Self::new("Artificial Liquid Intelligence NFT", "ALINFT")
    }

    fn constructor_args(&self) -> [Token; 2] {
        [
            Token::String(self.name.clone()),
            Token::String(self.symbol.clone()),
        ]
    }
}

async fn erc721_deploy_restricted(
    ctx: &DeployContext,
    contract: &str,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    ctx.require(contract)?
        .deploy(&meta.constructor_args(), a0)
        .await
}

async fn erc721_deploy(
    ctx: &DeployContext,
    contract: &str,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    let token = erc721_deploy_restricted(ctx, contract, a0, meta).await?;
    enable_all_features(&token, a0).await?;
    Ok(token)
}

/// Deploys a whitelabel ERC721 with all the features enabled.
pub async fn whitelabel_erc721_deploy(
    ctx: &DeployContext,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    erc721_deploy(ctx, WHITELABEL_NFT, a0, meta).await
}

/// Deploys a whitelabel ERC721 with no features enabled.
pub async fn whitelabel_erc721_deploy_restricted(
    ctx: &DeployContext,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    erc721_deploy_restricted(ctx, WHITELABEL_NFT, a0, meta).await
}

/// Deploys the Personality Pod ERC721 with all the features enabled.
pub async fn persona_deploy(
    ctx: &DeployContext,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    erc721_deploy(ctx, PERSONALITY_POD, a0, meta).await
}

/// Deploys the Personality Pod ERC721 with no features enabled.
pub async fn persona_deploy_restricted(
    ctx: &DeployContext,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    erc721_deploy_restricted(ctx, PERSONALITY_POD, a0, meta).await
}

/// Deploys the ALI NFT, the collection the fixed supply sale mints into, with all the features
/// enabled.
pub async fn ali_nft_deploy(
    ctx: &DeployContext,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    erc721_deploy(ctx, ALI_NFT, a0, meta).await
}

pub async fn ali_nft_deploy_restricted(
    ctx: &DeployContext,
    a0: Address,
    meta: &TokenMeta,
) -> Result<Contract, DeployError> {
    erc721_deploy_restricted(ctx, ALI_NFT, a0, meta).await
}
