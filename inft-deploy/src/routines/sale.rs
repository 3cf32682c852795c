use super::{
    erc721::{ali_nft_deploy, persona_deploy, TokenMeta},
    inft::{intelligent_nft_deploy, IntelligentNft},
    link_or_deploy, sale_window,
};
use crate::{
    constants::{ALI_ERC20, ALI_NFT, FIXED_SUPPLY_SALE, INTELLIGENT_NFT, PERSONALITY_POD},
    context::DeployContext,
    contract::Contract,
    error::DeployError,
    features_roles::{FEATURE_ALL, ROLE_MINTER, ROLE_TOKEN_CREATOR},
    util::encode::{serialize_address, serialize_uint},
};
use ethabi::{ethereum_types::U256, Address, Token, Uint};
use serde::Serialize;
use std::collections::BTreeMap;

/// Already deployed contracts a sale may be bound to. Anything left unset is deployed fresh.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaleDeps {
    pub ali: Option<Address>,
    pub nft: Option<Address>,
    pub persona: Option<Address>,
    pub inft: Option<Address>,
}

/// Sale initialization parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleParams {
    #[serde(serialize_with = "serialize_uint")]
    pub item_price: Uint,
    pub next_id: u32,
    pub items_on_sale: u32,
    pub final_id: u32,
    /// Seconds between the sale start and end.
    pub sale_duration: u32,
    pub batch_limit: u32,
    #[serde(serialize_with = "serialize_address")]
    pub ali_source: Address,
    #[serde(serialize_with = "serialize_uint")]
    pub ali_value: Uint,
}

impl SaleParams {
    /// 10 finney.
    pub const DEFAULT_ITEM_PRICE: Uint = U256([10_000_000_000_000_000, 0, 0, 0]);
}

impl Default for SaleParams {
    fn default() -> Self {
        Self {
            item_price: Self::DEFAULT_ITEM_PRICE,
            next_id: 1,
            items_on_sale: 10_000,
            final_id: 10_000,
            sale_duration: 3600,
            batch_limit: 0,
            ali_source: Address::zero(),
            ali_value: Uint::zero(),
        }
    }
}

/// A fixed supply sale together with everything it is wired to.
#[derive(Debug, Clone, Serialize)]
pub struct SaleDeployment {
    pub ali: Contract,
    pub nft: Contract,
    pub persona: Contract,
    pub inft: Contract,
    pub sale: Contract,
}

impl SaleDeployment {
    pub fn addresses(&self) -> BTreeMap<&'static str, Address> {
        BTreeMap::from([
            ("ali", self.ali.address()),
            ("nft", self.nft.address()),
            ("persona", self.persona.address()),
            ("inft", self.inft.address()),
            ("sale", self.sale.address()),
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializedSale {
    #[serde(flatten)]
    pub deployment: SaleDeployment,
    pub sale_start: u64,
    pub sale_end: u64,
    pub params: SaleParams,
}

impl InitializedSale {
    pub fn addresses(&self) -> BTreeMap<&'static str, Address> {
        self.deployment.addresses()
    }
}

/// Deploys a fixed supply sale bound to the given contracts, nothing else.
pub async fn sale_deploy_pure(
    ctx: &DeployContext,
    a0: Address,
    ali: Address,
    nft: Address,
    persona: Address,
    inft: Address,
) -> Result<Contract, DeployError> {
    let args = [ali, nft, persona, inft].map(Token::Address);
    ctx.require(FIXED_SUPPLY_SALE)?.deploy(&args, a0).await
}

/// Binds the iNFT at `inft` and the ALI token it records, failing if `ali` names another token.
async fn link_inft(
    ctx: &DeployContext,
    inft: Address,
    ali: Option<Address>,
) -> Result<IntelligentNft, DeployError> {
    let inft = ctx.require(INTELLIGENT_NFT)?.at(inft);
    let recorded = inft.call_address("aliContract").await?;
    match ali {
        Some(supplied) if supplied != recorded => Err(DeployError::AddressMismatch {
            contract: ALI_ERC20,
            supplied,
            recorded,
        }),
        _ => Ok(IntelligentNft {
            ali: ctx.require(ALI_ERC20)?.at(recorded),
            inft,
        }),
    }
}

/// Deploys a fixed supply sale with no features enabled and no roles granted.
///
/// Dependencies missing from `deps` are deployed first, fully enabled. When the iNFT is given,
/// the ALI token is taken from it, and a conflicting `deps.ali` is rejected before anything is
/// sent.
pub async fn sale_deploy_restricted(
    ctx: &DeployContext,
    a0: Address,
    deps: SaleDeps,
) -> Result<SaleDeployment, DeployError> {
    let IntelligentNft { ali, inft } = match deps.inft {
        Some(inft) => link_inft(ctx, inft, deps.ali).await?,
        None => intelligent_nft_deploy(ctx, a0, deps.ali).await?,
    };
    let nft_meta = TokenMeta::ali_nft();
    let nft = link_or_deploy(ctx, ALI_NFT, deps.nft, ali_nft_deploy(ctx, a0, &nft_meta)).await?;
    let persona_meta = TokenMeta::persona();
    let persona = link_or_deploy(
        ctx,
        PERSONALITY_POD,
        deps.persona,
        persona_deploy(ctx, a0, &persona_meta),
    )
    .await?;
    let sale = sale_deploy_pure(
        ctx,
        a0,
        ali.address(),
        nft.address(),
        persona.address(),
        inft.address(),
    )
    .await?;
    Ok(SaleDeployment {
        ali,
        nft,
        persona,
        inft,
        sale,
    })
}

/// Deploys a fixed supply sale with all the features enabled and the roles it needs to mint
/// NFTs, personalities and iNFTs.
pub async fn sale_deploy(
    ctx: &DeployContext,
    a0: Address,
    deps: SaleDeps,
) -> Result<SaleDeployment, DeployError> {
    let deployment = sale_deploy_restricted(ctx, a0, deps).await?;
    let sale = deployment.sale.address();
    deployment.sale.update_features(FEATURE_ALL, a0).await?;
    deployment.nft.update_role(sale, ROLE_TOKEN_CREATOR, a0).await?;
    deployment
        .persona
        .update_role(sale, ROLE_TOKEN_CREATOR, a0)
        .await?;
    deployment.inft.update_role(sale, ROLE_MINTER, a0).await?;
    Ok(deployment)
}

/// [sale_deploy], then opens the sale at the current chain time for `params.sale_duration`
/// seconds.
pub async fn sale_deploy_initialized(
    ctx: &DeployContext,
    a0: Address,
    deps: SaleDeps,
    params: &SaleParams,
) -> Result<InitializedSale, DeployError> {
    let deployment = sale_deploy(ctx, a0, deps).await?;
    let (sale_start, sale_end) = sale_window(ctx, params.sale_duration).await?;
    let args = [
        Token::Uint(params.item_price),
        Token::Uint(params.next_id.into()),
        Token::Uint(params.final_id.into()),
        Token::Uint(sale_start.into()),
        Token::Uint(sale_end.into()),
        Token::Uint(params.batch_limit.into()),
        Token::Address(params.ali_source),
        Token::Uint(params.ali_value),
    ];
    deployment.sale.send("initialize", &args, a0).await?;
    Ok(InitializedSale {
        deployment,
        sale_start,
        sale_end,
        params: params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = SaleParams::default();
        assert_eq!(params.item_price, Uint::exp10(16));
        assert_eq!(params.next_id, 1);
        assert_eq!(params.final_id, 10_000);
        assert_eq!(params.items_on_sale, 10_000);
        assert_eq!(params.sale_duration, 3600);
        assert_eq!(params.batch_limit, 0);
        assert!(params.ali_source.is_zero());
        assert!(params.ali_value.is_zero());
    }

    #[test]
    fn params_serialize_as_decimal_strings() {
        let json = serde_json::to_value(SaleParams::default()).unwrap();
        assert_eq!(json["itemPrice"], "10000000000000000");
        assert_eq!(json["saleDuration"], 3600);
        assert_eq!(
            json["aliSource"],
            "0x0000000000000000000000000000000000000000"
        );
        assert_eq!(json["aliValue"], "0");
    }

    #[test]
    fn deps_default_to_fresh_deployments() {
        let deps = SaleDeps::default();
        assert!(deps.ali.is_none() && deps.nft.is_none());
        assert!(deps.persona.is_none() && deps.inft.is_none());
    }
}
