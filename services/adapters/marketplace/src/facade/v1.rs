//! Marketplace V1 facade

use std::sync::Arc;

use marketplace_config::deployments;
use tokio::task::JoinHandle;
use web3::types::{BlockNumber, Log, H160, U256};

use super::{call_uint, default_address, sale_details_args};
use crate::abi::MarketplaceVersion;
use crate::client::ChainClient;
use crate::contract::MarketplaceContract;
use crate::error::Result;
use crate::records::v1::*;

/// Current marketplace contract (single-NFT listings)
pub struct MarketplaceV1<C> {
    contract: MarketplaceContract<C>,
}

impl<C: ChainClient> MarketplaceV1<C> {
    /// Facade over the known V1 deployment
    pub fn new(client: Arc<C>) -> Result<Self> {
        Ok(Self::with_address(client, default_address(&deployments::V1)?))
    }

    pub fn with_address(client: Arc<C>, address: H160) -> Self {
        Self {
            contract: MarketplaceContract::new(client, address, MarketplaceVersion::V1),
        }
    }

    pub fn contract(&self) -> &MarketplaceContract<C> {
        &self.contract
    }

    pub async fn on_new_listing<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewListing) + Send + 'static,
    {
        self.contract.on::<NewListing, _>(callback).await
    }

    pub async fn on_new_listing_batch<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewListingBatch) + Send + 'static,
    {
        self.contract.on::<NewListingBatch, _>(callback).await
    }

    pub async fn on_sold<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(Sold) + Send + 'static,
    {
        self.contract.on::<Sold, _>(callback).await
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

    /// Offers with a flag telling whether they target a sale
    pub async fn on_new_offer<F>(&self, mut callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewOffer, bool) + Send + 'static,
    {
        self.contract
            .on::<NewOffer, _>(move |offer| {
                let is_sale_offer = offer.is_sale_offer();
                callback(offer, is_sale_offer)
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

    pub async fn on_offer_updated<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(OfferUpdated) + Send + 'static,
    {
        self.contract.on::<OfferUpdated, _>(callback).await
    }

    pub async fn on_new_collection_offer<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewCollectionOffer) + Send + 'static,
    {
        self.contract.on::<NewCollectionOffer, _>(callback).await
    }

    pub async fn on_new_filtered_collection_offer<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnMut(NewFilteredCollectionOffer) + Send + 'static,
    {
        self.contract.on::<NewFilteredCollectionOffer, _>(callback).await
    }

    /// Decode a `NewOffer` log fetched elsewhere
    pub fn handle_new_offer(&self, log: &Log) -> Result<(NewOffer, bool)> {
        let offer: NewOffer = self.contract.decode(log)?;
        let is_sale_offer = offer.is_sale_offer();
        Ok((offer, is_sale_offer))
    }

    pub async fn query_new_listings(&self, from: BlockNumber, to: BlockNumber) -> Result<Vec<NewListing>> {
        self.contract.query(from, to).await
    }

    pub async fn query_new_listing_batches(
        &self,
        from: BlockNumber,
        to: BlockNumber,
    ) -> Result<Vec<NewListingBatch>> {
        self.contract.query(from, to).await
    }

    pub async fn query_new_offers(
        &self,
        from: BlockNumber,
        to: BlockNumber,
    ) -> Result<Vec<(NewOffer, bool)>> {
        let offers: Vec<NewOffer> = self.contract.query(from, to).await?;
        Ok(offers
            .into_iter()
            .map(|offer| {
                let is_sale_offer = offer.is_sale_offer();
                (offer, is_sale_offer)
            })
            .collect())
    }

    pub async fn query_new_collection_offers(
        &self,
        from: BlockNumber,
        to: BlockNumber,
    ) -> Result<Vec<NewCollectionOffer>> {
        self.contract.query(from, to).await
    }

    pub async fn query_new_filtered_collection_offers(
        &self,
        from: BlockNumber,
        to: BlockNumber,
    ) -> Result<Vec<NewFilteredCollectionOffer>> {
        self.contract.query(from, to).await
    }

    pub async fn query_offers_removed(
        &self,
        from: BlockNumber,
        to: BlockNumber,
    ) -> Result<Vec<OfferRemoved>> {
        self.contract.query(from, to).await
    }

    pub async fn query_offers_accepted(
        &self,
        from: BlockNumber,
        to: BlockNumber,
    ) -> Result<Vec<OfferAccepted>> {
        self.contract.query(from, to).await
    }

    pub async fn query_finished(&self, from: BlockNumber, to: BlockNumber) -> Result<Vec<SaleFinished>> {
        self.contract.query(from, to).await
    }

    pub async fn get_sale_details(&self, marketplace_id: U256) -> Result<SaleDetails> {
        let args = sale_details_args(&self.contract, marketplace_id).await?;
        Ok(SaleDetails::from_args(args)?)
    }

    /// Id the next listing will receive (`currentMarketplaceId()`)
    pub async fn get_next_marketplace_id(&self) -> Result<U256> {
        call_uint(&self.contract, "currentMarketplaceId", &[]).await
    }
}
