//! Marketplace V2 records
//!
//! Bundle prices are for the whole bundle; per-item records carry a price
//! prorated by the item's share of the bundle (see [`crate::split`]).

use serde::{Deserialize, Serialize};
use web3::types::{H160, U256};

use crate::abi::{DecodingError, EventArgs, LogRef, MarketplaceEvent, MarketplaceVersion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBundleSale {
    pub marketplace_id: U256,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub price: U256,
    pub duration: U256,
    pub is_auction: bool,
    /// Number of bundles for sale
    pub amount: U256,
    pub is_nsfw: bool,
    pub marketplace_uri: String,
    pub search_keywords: String,
    pub router_addresses: Vec<H160>,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for NewBundleSale {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "NewSale";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            nfts: args.address_array(1)?,
            token_ids: args.uint_array(2)?,
            amount_batches: args.uint_array(3)?,
            price: args.uint(4)?,
            duration: args.uint(5)?,
            is_auction: args.boolean(6)?,
            amount: args.uint(7)?,
            is_nsfw: args.boolean(8)?,
            marketplace_uri: args.string(9)?,
            search_keywords: args.string(10)?,
            router_addresses: args.address_array(11)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub marketplace_id: U256,
    pub collection: H160,
    pub token_id: U256,
    pub amount_in_bundle: U256,
    pub amount: U256,
    /// Prorated price of one unit of this NFT
    pub price: U256,
    pub duration: U256,
    pub is_auction: bool,
    pub is_nsfw: bool,
    pub log: Option<LogRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSold {
    pub marketplace_id: U256,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub price: U256,
    pub buyer: H160,
    pub seller: H160,
    pub amount: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for BundleSold {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "Sold";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            nfts: args.address_array(1)?,
            token_ids: args.uint_array(2)?,
            amount_batches: args.uint_array(3)?,
            price: args.uint(4)?,
            buyer: args.address(5)?,
            seller: args.address(6)?,
            amount: args.uint(7)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sold {
    pub marketplace_id: U256,
    pub collection: H160,
    pub token_id: U256,
    pub amount_in_bundle: U256,
    pub amount: U256,
    pub price: U256,
    pub buyer: H160,
    pub seller: H160,
    pub log: Option<LogRef>,
}

/// `SaleFinished` as emitted; only interesting when `failed_sell_all` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFinished {
    pub marketplace_id: U256,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub failed_sell_all: bool,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for SaleFinished {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "SaleFinished";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            nfts: args.address_array(1)?,
            token_ids: args.uint_array(2)?,
            amount_batches: args.uint_array(3)?,
            failed_sell_all: args.boolean(4)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledSale {
    pub marketplace_id: U256,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for CancelledSale {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "CancelledSale";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            nfts: args.address_array(1)?,
            token_ids: args.uint_array(2)?,
            amount_batches: args.uint_array(3)?,
            log: args.log(),
        })
    }
}

/// A bundle that left the market without selling, either cancelled or
/// finished with `failedSellAll`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleUnsold {
    pub marketplace_id: U256,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub log: Option<LogRef>,
}

impl From<SaleFinished> for BundleUnsold {
    fn from(finished: SaleFinished) -> Self {
        Self {
            marketplace_id: finished.marketplace_id,
            nfts: finished.nfts,
            token_ids: finished.token_ids,
            amount_batches: finished.amount_batches,
            log: finished.log,
        }
    }
}

impl From<CancelledSale> for BundleUnsold {
    fn from(cancelled: CancelledSale) -> Self {
        Self {
            marketplace_id: cancelled.marketplace_id,
            nfts: cancelled.nfts,
            token_ids: cancelled.token_ids,
            amount_batches: cancelled.amount_batches,
            log: cancelled.log,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unsold {
    pub marketplace_id: U256,
    pub collection: H160,
    pub token_id: U256,
    pub amount_in_bundle: U256,
    pub log: Option<LogRef>,
}

/// New bundle price; not split because the event has no `amountBatches`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlePriceUpdate {
    pub marketplace_id: U256,
    pub price: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for BundlePriceUpdate {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "UpdatePrice";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            price: args.uint(1)?,
            log: args.log(),
        })
    }
}

/// Auctions with bids near the end get extended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationExtended {
    pub marketplace_id: U256,
    pub end_time: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for DurationExtended {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "UpdateEndTime";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            end_time: args.uint(1)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBid {
    pub marketplace_id: U256,
    pub bidder: H160,
    pub bid: U256,
    pub next_minimum: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for NewBid {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "NewBid";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            bidder: args.address(1)?,
            bid: args.uint(2)?,
            next_minimum: args.uint(3)?,
            log: args.log(),
        })
    }
}

/// An offer on a sale; V2 offers always reference a sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub marketplace_id: U256,
    pub offerrer: H160,
    pub offer: U256,
    pub next_minimum: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for NewOffer {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V2;
    const EVENT_NAME: &'static str = "NewOffer";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            offerrer: args.address(1)?,
            offer: args.uint(2)?,
            next_minimum: args.uint(3)?,
            log: args.log(),
        })
    }
}

/// `getSaleDetails` result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub seller: H160,
    /// Reserve price for auctions
    pub price: U256,
    pub start_time: U256,
    pub end_time: U256,
    pub max_bid_or_offer: U256,
    pub max_bidder_or_offerer: H160,
    pub is_auction: bool,
    /// Bundles for sale and bundles left
    pub amount: U256,
    pub amount_remaining: U256,
    pub complete: bool,
    pub dev_fee_percentage: U256,
}

impl SaleDetails {
    pub fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        let d = super::struct_components(args)?;
        Ok(Self {
            nfts: d.address_array(0)?,
            token_ids: d.uint_array(1)?,
            amount_batches: d.uint_array(2)?,
            seller: d.address(3)?,
            price: d.uint(4)?,
            start_time: d.uint(5)?,
            end_time: d.uint(6)?,
            max_bid_or_offer: d.uint(7)?,
            max_bidder_or_offerer: d.address(8)?,
            is_auction: d.boolean(9)?,
            amount: d.uint(10)?,
            amount_remaining: d.uint(11)?,
            complete: d.boolean(12)?,
            dev_fee_percentage: d.uint(13)?,
        })
    }
}
