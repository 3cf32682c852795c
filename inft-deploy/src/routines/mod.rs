//! Deployment routines for the protocol contracts.
//!
//! Every contract comes in up to three flavours:
//!
//! - `*_deploy_pure` deploys exactly one contract bound to the dependency addresses it is given,
//!   and touches nothing else;
//! - `*_deploy_restricted` first deploys (fully enabled) defaults for every dependency it is not
//!   given, then the contract itself, leaving its features disabled;
//! - `*_deploy` additionally enables every feature of the new contract and grants it the roles it
//!   needs on its dependencies. `*_deploy_initialized` then also runs the sale's initializer.
//!
//! All transactions are sent by the signer `a0`, one at a time, in the order listed in each routine.

mod drop;
mod erc20;
mod erc721;
mod inft;
mod mintable_sale;
mod os_factory;
mod sale;

pub use drop::{nft_drop_deploy_pure, persona_drop_deploy_restricted, PersonaDrop};
pub use erc20::{ali_erc20_deploy, ali_erc20_deploy_restricted};
pub use erc721::{
    ali_nft_deploy, ali_nft_deploy_restricted, persona_deploy, persona_deploy_restricted,
    whitelabel_erc721_deploy, whitelabel_erc721_deploy_restricted, TokenMeta,
};
pub use inft::{intelligent_nft_deploy, IntelligentNft};
pub use mintable_sale::{
    mintable_sale_deploy_pure, persona_sale_deploy, persona_sale_deploy_initialized,
    persona_sale_deploy_restricted, InitializedPersonaSale, PersonaSale,
};
pub use os_factory::os_factory_deploy_pure;
pub use sale::{
    sale_deploy, sale_deploy_initialized, sale_deploy_pure, sale_deploy_restricted,
    InitializedSale, SaleDeployment, SaleDeps, SaleParams,
};

use crate::{
    block_utils::default_deadline, context::DeployContext, contract::Contract,
    error::DeployError, features_roles::FEATURE_ALL,
};
use ethabi::Address;

async fn enable_all_features(contract: &Contract, a0: Address) -> Result<(), DeployError> {
    contract.update_features(FEATURE_ALL, a0).await?;
    Ok(())
}

/// Binds `name` at `address` when given, otherwise runs `deploy`.
async fn link_or_deploy<F>(
    ctx: &DeployContext,
    name: &str,
    address: Option<Address>,
    deploy: F,
) -> Result<Contract, DeployError>
where
    F: std::future::Future<Output = Result<Contract, DeployError>>,
{
    match address {
        Some(address) => Ok(ctx.require(name)?.at(address)),
        None => deploy.await,
    }
}

/// Sale start is the next deadline on the chain clock, the end follows after `duration` seconds.
async fn sale_window(ctx: &DeployContext, duration: u32) -> Result<(u64, u64), DeployError> {
    let sale_start = default_deadline(ctx.client().as_ref(), 0).await?;
    Ok((sale_start, sale_start.saturating_add(u64::from(duration))))
}
