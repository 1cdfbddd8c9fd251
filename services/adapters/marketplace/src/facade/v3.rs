//! Marketplace V3 facade
//!
//! Like V2 this contract sells bundles, but per-item records keep the
//! bundle's unit and total prices instead of prorating them.

use std::sync::Arc;

use ethabi::Token;
use marketplace_config::deployments;
use tokio::task::JoinHandle;
use web3::types::{H160, U256};

use super::{call_uint, default_address, sale_details_args};
use crate::abi::MarketplaceVersion;
use crate::client::ChainClient;
use crate::contract::MarketplaceContract;
use crate::error::Result;
use crate::records::v3::*;
use crate::split::V3BundleSplitter;

/// Fantom bundle marketplace with offers and delayed starts
pub struct MarketplaceV3<C> {
    contract: MarketplaceContract<C>,
}

impl<C: ChainClient> MarketplaceV3<C> {
    /// Facade over the known V3 deployment
    pub fn new(client: Arc<C>) -> Result<Self> {
        Ok(Self::with_address(client, default_address(&deployments::V3)?))
    }

    pub fn with_address(client: Arc<C>, address: H160) -> Self {
        Self {
            contract: MarketplaceContract::new(client, address, MarketplaceVersion::V3),
        }
    }

    pub fn contract(&self) -> &MarketplaceContract<C> {
        &self.contract
    }

    pub async fn on_new_listing_as_bundle<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewBundleListing) + Send + 'static,
    {
        self.contract.on::<NewBundleListing, _>(callback).await
    }

    /// One callback per NFT of each new bundle
    pub async fn on_new_listing<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewListing) + Send + 'static,
    {
        self.contract
            .on::<NewBundleListing, _>(move |bundle| {
                V3BundleSplitter::split_bundle_new_listing(&bundle)
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
                V3BundleSplitter::split_bundle_sold(&bundle)
                    .into_iter()
                    .for_each(&mut callback)
            })
            .await
    }

    pub async fn on_finished<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(SaleFinished) + Send + 'static,
    {
        self.contract.on::<SaleFinished, _>(callback).await
    }

    pub async fn on_cancelled<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(Cancelled) + Send + 'static,
    {
        self.contract.on::<Cancelled, _>(callback).await
    }

    pub async fn on_price_update<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(PriceUpdate) + Send + 'static,
    {
        self.contract.on::<PriceUpdate, _>(callback).await
    }

    pub async fn on_start_delayed<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(StartDelayed) + Send + 'static,
    {
        self.contract.on::<StartDelayed, _>(callback).await
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

    pub async fn on_new_offer_as_bundle<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewBundleOffer, bool) + Send + 'static,
    {
        self.contract
            .on::<NewBundleOffer, _>(move |bundle| {
                let is_sale_offer = bundle.is_sale_offer();
                callback(bundle, is_sale_offer)
            })
            .await
    }

    /// One callback per NFT of each offer, with the sale-offer flag
    pub async fn on_new_offer<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewOffer, bool) + Send + 'static,
    {
        self.contract
            .on::<NewBundleOffer, _>(move |bundle| {
                let is_sale_offer = bundle.is_sale_offer();
                for offer in V3BundleSplitter::split_bundle_new_offer(&bundle) {
                    callback(offer, is_sale_offer);
                }
            })
            .await
    }

    pub async fn on_offer_removed<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(OfferRemoved) + Send + 'static,
    {
        self.contract.on::<OfferRemoved, _>(callback).await
    }

    pub async fn on_offer_accepted<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(OfferAccepted) + Send + 'static,
    {
        self.contract.on::<OfferAccepted, _>(callback).await
    }

    pub async fn on_offer_rejected<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(OfferRejected) + Send + 'static,
    {
        self.contract.on::<OfferRejected, _>(callback).await
    }

    pub async fn on_offer_updated<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(OfferUpdated) + Send + 'static,
    {
        self.contract.on::<OfferUpdated, _>(callback).await
    }

    pub async fn get_sale_details(&self, marketplace_id: U256) -> Result<SaleDetails> {
        let args = sale_details_args(&self.contract, marketplace_id).await?;
        Ok(SaleDetails::from_args(args)?)
    }

    pub async fn get_next_minimum_bid(&self, marketplace_id: U256) -> Result<U256> {
        call_uint(&self.contract, "nextMinimumBid", &[Token::Uint(marketplace_id)]).await
    }

    /// Id the next listing will receive (`currentMarketplaceId()`)
    pub async fn get_next_marketplace_id(&self) -> Result<U256> {
        call_uint(&self.contract, "currentMarketplaceId", &[]).await
    }
}
