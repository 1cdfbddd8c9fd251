//! Version facades
//!
//! One facade per contract generation. `on_*` methods subscribe to an event
//! and deliver typed records (split per NFT where the method says so) to a
//! callback on a background task; `get_*` methods are read-only calls.
//!
//! ```text
//! ChainClient ──logs──▶ MarketplaceContract ──decode──▶ record ──split──▶ callback
//! ```

pub mod v1;
pub mod v2;
pub mod v3;

pub use v1::MarketplaceV1;
pub use v2::MarketplaceV2;
pub use v3::MarketplaceV3;

use ethabi::Token;
use marketplace_config::Deployment;
use web3::types::{H160, U256};

use crate::abi::EventArgs;
use crate::client::ChainClient;
use crate::contract::{parse_address, MarketplaceContract};
use crate::error::Result;

fn default_address(deployment: &Deployment) -> Result<H160> {
    parse_address(deployment.address)
}

/// Call a function that takes and returns a single `uint256`
async fn call_uint<C: ChainClient>(
    contract: &MarketplaceContract<C>,
    function: &'static str,
    args: &[Token],
) -> Result<U256> {
    let tokens = contract.call(function, args).await?;
    Ok(EventArgs::from_tokens(function, tokens).uint(0)?)
}

/// `getSaleDetails(marketplaceId)` return tokens
async fn sale_details_args<C: ChainClient>(
    contract: &MarketplaceContract<C>,
    marketplace_id: U256,
) -> Result<EventArgs> {
    let tokens = contract
        .call("getSaleDetails", &[Token::Uint(marketplace_id)])
        .await?;
    Ok(EventArgs::from_tokens("getSaleDetails", tokens))
}
