use super::{
    enable_all_features,
    erc721::{persona_deploy, TokenMeta},
    link_or_deploy,
    sale::SaleParams,
    sale_window,
};
use crate::{
    constants::{MINTABLE_SALE, PERSONALITY_POD},
    context::DeployContext,
    contract::Contract,
    error::DeployError,
    features_roles::ROLE_TOKEN_CREATOR,
};
use ethabi::{Address, Token};
use serde::Serialize;
use std::collections::BTreeMap;

/// A mintable sale selling Personality Pods.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaSale {
    pub persona: Contract,
    pub sale: Contract,
}

impl PersonaSale {
    pub fn addresses(&self) -> BTreeMap<&'static str, Address> {
        BTreeMap::from([
            ("persona", self.persona.address()),
            ("sale", self.sale.address()),
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializedPersonaSale {
    #[serde(flatten)]
    pub deployment: PersonaSale,
    pub sale_start: u64,
    pub sale_end: u64,
    pub params: SaleParams,
}

impl InitializedPersonaSale {
    pub fn addresses(&self) -> BTreeMap<&'static str, Address> {
        self.deployment.addresses()
    }
}

/// Deploys a mintable sale over the ERC721 at `token`, nothing else.
pub async fn mintable_sale_deploy_pure(
    ctx: &DeployContext,
    a0: Address,
    token: Address,
) -> Result<Contract, DeployError> {
    ctx.require(MINTABLE_SALE)?
        .deploy(&[Token::Address(token)], a0)
        .await
}

/// Deploys a mintable sale over the Personality Pod at `persona`, or over a fresh one, with no
/// features enabled and no roles granted.
pub async fn persona_sale_deploy_restricted(
    ctx: &DeployContext,
    a0: Address,
    persona: Option<Address>,
) -> Result<PersonaSale, DeployError> {
    let meta = TokenMeta::persona();
    let persona =
        link_or_deploy(ctx, PERSONALITY_POD, persona, persona_deploy(ctx, a0, &meta)).await?;
    let sale = mintable_sale_deploy_pure(ctx, a0, persona.address()).await?;
    Ok(PersonaSale { persona, sale })
}

/// Deploys a mintable Personality Pod sale with all the features enabled, allowed to mint pods.
pub async fn persona_sale_deploy(
    ctx: &DeployContext,
    a0: Address,
    persona: Option<Address>,
) -> Result<PersonaSale, DeployError> {
    let deployment = persona_sale_deploy_restricted(ctx, a0, persona).await?;
    enable_all_features(&deployment.sale, a0).await?;
    deployment
        .persona
        .update_role(deployment.sale.address(), ROLE_TOKEN_CREATOR, a0)
        .await?;
    Ok(deployment)
}

/// [persona_sale_deploy], then opens the sale at the current chain time.
///
/// The mintable sale takes no ALI payment, so `params.ali_source` and `params.ali_value` are not
/// sent.
pub async fn persona_sale_deploy_initialized(
    ctx: &DeployContext,
    a0: Address,
    persona: Option<Address>,
    params: &SaleParams,
) -> Result<InitializedPersonaSale, DeployError> {
    let deployment = persona_sale_deploy(ctx, a0, persona).await?;
    let (sale_start, sale_end) = sale_window(ctx, params.sale_duration).await?;
    let args = [
        Token::Uint(params.item_price),
        Token::Uint(params.next_id.into()),
        Token::Uint(params.final_id.into()),
        Token::Uint(sale_start.into()),
        Token::Uint(sale_end.into()),
        Token::Uint(params.batch_limit.into()),
    ];
    deployment.sale.send("initialize", &args, a0).await?;
    Ok(InitializedPersonaSale {
        deployment,
        sale_start,
        sale_end,
        params: params.clone(),
    })
}
