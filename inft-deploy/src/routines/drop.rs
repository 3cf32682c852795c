use super::{
    erc721::{persona_deploy, TokenMeta},
    link_or_deploy,
};
use crate::{
    constants::{ERC721_DROP, PERSONALITY_POD},
    context::DeployContext,
    contract::Contract,
    error::DeployError,
    features_roles::ROLE_TOKEN_CREATOR,
};
use ethabi::{Address, Token};
use serde::Serialize;
use std::collections::BTreeMap;

/// An airdrop minting Personality Pods.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaDrop {
    pub persona: Contract,
    pub airdrop: Contract,
}

impl PersonaDrop {
    pub fn addresses(&self) -> BTreeMap<&'static str, Address> {
        BTreeMap::from([
            ("persona", self.persona.address()),
            ("airdrop", self.airdrop.address()),
        ])
    }
}

/// Deploys an airdrop over the Personality Pod at `persona`, or over a fresh one, and allows it to
/// mint pods. The drop's own features are left disabled.
pub async fn persona_drop_deploy_restricted(
    ctx: &DeployContext,
    a0: Address,
    persona: Option<Address>,
) -> Result<PersonaDrop, DeployError> {
    let meta = TokenMeta::persona();
    let persona =
        link_or_deploy(ctx, PERSONALITY_POD, persona, persona_deploy(ctx, a0, &meta)).await?;
    let airdrop = nft_drop_deploy_pure(ctx, a0, persona.address()).await?;
    persona
        .update_role(airdrop.address(), ROLE_TOKEN_CREATOR, a0)
        .await?;
    Ok(PersonaDrop { persona, airdrop })
}

/// Deploys an ERC721 airdrop over the token at `nft`, nothing else.
pub async fn nft_drop_deploy_pure(
    ctx: &DeployContext,
    a0: Address,
    nft: Address,
) -> Result<Contract, DeployError> {
    ctx.require(ERC721_DROP)?
        .deploy(&[Token::Address(nft)], a0)
        .await
}
