//! Marketplace V2 facade
//!
//! V2 sells bundles. The plain `on_*` methods split each bundle into one
//! record per NFT with a prorated price; the `*_as_bundle` variants deliver
//! the bundle as emitted.

use std::sync::Arc;

use ethabi::Token;
use futures_util::future;
use futures_util::stream::{self, BoxStream, StreamExt};
use marketplace_config::deployments;
use tokio::task::JoinHandle;
use web3::types::{H160, U256};

use super::{call_uint, default_address, sale_details_args};
use crate::abi::MarketplaceVersion;
use crate::client::ChainClient;
use crate::contract::{spawn_listener, MarketplaceContract};
use crate::error::Result;
use crate::records::v2::*;
use crate::split::V2BundleSplitter;

/// Fantom bundle marketplace (ratio-prorated prices)
pub struct MarketplaceV2<C> {
    contract: MarketplaceContract<C>,
}

impl<C: ChainClient> MarketplaceV2<C> {
    /// Facade over the known V2 deployment
    pub fn new(client: Arc<C>) -> Result<Self> {
        Ok(Self::with_address(client, default_address(&deployments::V2)?))
    }

    pub fn with_address(client: Arc<C>, address: H160) -> Self {
        Self {
            contract: MarketplaceContract::new(client, address, MarketplaceVersion::V2),
        }
    }

    pub fn contract(&self) -> &MarketplaceContract<C> {
        &self.contract
    }

    pub async fn on_new_sale_as_bundle<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewBundleSale) + Send + 'static,
    {
        self.contract.on::<NewBundleSale, _>(callback).await
    }

    /// One callback per NFT of each new bundle
    pub async fn on_new_sale<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewSale) + Send + 'static,
    {
        self.contract
            .on::<NewBundleSale, _>(move |bundle| {
                V2BundleSplitter::split_bundle_new_sale(&bundle)
                    .into_iter()
                    .for_each(&mut callback)
            })
            .await
    }

    pub async fn on_sold_as_bundle<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(BundleSold) + Send + 'static,
    {
        self.contract.on::<BundleSold, _>(callback).await
    }

    /// One callback per NFT of each sold bundle
    pub async fn on_sold<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(Sold) + Send + 'static,
    {
        self.contract
            .on::<BundleSold, _>(move |bundle| {
                V2BundleSplitter::split_bundle_sold(&bundle)
                    .into_iter()
                    .for_each(&mut callback)
            })
            .await
    }

    /// Cancelled sales and sales that finished with `failedSellAll`, merged
    ///
    /// Items arrive as `(bundle, cancelled)`.
    async fn unsold_stream(&self) -> Result<BoxStream<'static, Result<(BundleUnsold, bool)>>> {
        let finished = self
            .contract
            .subscribe::<SaleFinished>()
            .await?
            .filter_map(|item| {
                future::ready(match item {
                    Ok(finished) if !finished.failed_sell_all => None,
                    Ok(finished) => Some(Ok((BundleUnsold::from(finished), false))),
                    Err(e) => Some(Err(e)),
                })
            });
        let cancelled = self
            .contract
            .subscribe::<CancelledSale>()
            .await?
            .map(|item| item.map(|cancelled| (BundleUnsold::from(cancelled), true)));

        Ok(stream::select(finished, cancelled).boxed())
    }

    pub async fn on_unsold_as_bundle<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(BundleUnsold, bool) + Send + 'static,
    {
        let stream = self.unsold_stream().await?;
        Ok(spawn_listener("Unsold", stream, move |(bundle, cancelled)| {
            callback(bundle, cancelled)
        }))
    }

    /// One callback per NFT of each unsold bundle, with the `cancelled` flag
    pub async fn on_unsold<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(Unsold, bool) + Send + 'static,
    {
        let stream = self.unsold_stream().await?;
        Ok(spawn_listener("Unsold", stream, move |(bundle, cancelled)| {
            for item in V2BundleSplitter::split_bundle_unsold(&bundle) {
                callback(item, cancelled);
            }
        }))
    }

    pub async fn on_price_update<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(BundlePriceUpdate) + Send + 'static,
    {
        self.contract.on::<BundlePriceUpdate, _>(callback).await
    }

    pub async fn on_duration_extended<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(DurationExtended) + Send + 'static,
    {
        self.contract.on::<DurationExtended, _>(callback).await
    }

    pub async fn on_new_bid<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewBid) + Send + 'static,
    {
        self.contract.on::<NewBid, _>(callback).await
    }

    pub async fn on_new_offer<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewOffer) + Send + 'static,
    {
        self.contract.on::<NewOffer, _>(callback).await
    }

    pub async fn get_sale_details(&self, marketplace_id: U256) -> Result<SaleDetails> {
        let args = sale_details_args(&self.contract, marketplace_id).await?;
        Ok(SaleDetails::from_args(args)?)
    }

    /// Smallest bid (auctions) or offer (fixed price) the contract accepts next
    pub async fn get_next_minimum_bid_or_offer(&self, marketplace_id: U256) -> Result<U256> {
        call_uint(
            &self.contract,
            "nextMinimumBidOrOffer",
            &[Token::Uint(marketplace_id)],
        )
        .await
    }
}
