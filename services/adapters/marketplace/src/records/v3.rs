//! Marketplace V3 records

use serde::{Deserialize, Serialize};
use web3::types::{H160, U256};

use crate::abi::{DecodingError, EventArgs, LogRef, MarketplaceEvent, MarketplaceVersion};
use crate::offer::classify_offer;

/// A new sale, as the bundle the contract emitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBundleListing {
    pub marketplace_id: U256,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub amount: U256,
    pub price_per_unit: U256,
    /// `price_per_unit * amount`, clamped to `U256::MAX` if the product overflows
    pub price_total: U256,
    pub duration: U256,
    pub is_auction: bool,
    pub is_nsfw: bool,
    pub search_keywords: String,
    pub router_addresses: Vec<H160>,
    pub seller: H160,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for NewBundleListing {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "NewSale";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        let price = args.uint(4)?;
        let amount = args.uint(7)?;
        Ok(Self {
            marketplace_id: args.uint(0)?,
            nfts: args.address_array(1)?,
            token_ids: args.uint_array(2)?,
            amount_batches: args.uint_array(3)?,
            amount,
            price_per_unit: price,
            price_total: price.saturating_mul(amount),
            duration: args.uint(5)?,
            is_auction: args.boolean(6)?,
            is_nsfw: args.boolean(8)?,
            search_keywords: args.string(9)?,
            router_addresses: args.address_array(10)?,
            seller: args.address(11)?,
            log: args.log(),
        })
    }
}

/// One NFT of a new sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub marketplace_id: U256,
    pub collection: H160,
    pub token_id: U256,
    pub amount_per_bundle_unit: U256,
    pub amount: U256,
    /// Bundle price; per-item prices are not known for bundles
    pub price_per_unit: U256,
    pub price_total: U256,
    pub duration: U256,
    pub is_auction: bool,
    pub is_nsfw: bool,
    pub seller: H160,
    pub log: Option<LogRef>,
}

/// A completed sale (direct buy, accepted offer or auction with a bid), as a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSold {
    pub marketplace_id: U256,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub amount_batches: Vec<U256>,
    pub amount: U256,
    pub price_per_unit: U256,
    /// `price_per_unit * amount`, clamped to `U256::MAX` if the product overflows
    pub price_total: U256,
    pub buyer: H160,
    pub seller: H160,
    pub offer_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for BundleSold {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "Sold";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        let price = args.uint(4)?;
        let amount = args.uint(7)?;
        Ok(Self {
            marketplace_id: args.uint(0)?,
            nfts: args.address_array(1)?,
            token_ids: args.uint_array(2)?,
            amount_batches: args.uint_array(3)?,
            amount,
            price_per_unit: price,
            price_total: price.saturating_mul(amount),
            buyer: args.address(5)?,
            seller: args.address(6)?,
            offer_id: args.uint(8)?,
            log: args.log(),
        })
    }
}

/// One NFT of a completed sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sold {
    pub marketplace_id: U256,
    pub collection: H160,
    pub token_id: U256,
    pub amount_per_bundle_unit: U256,
    pub amount: U256,
    pub price_per_unit: U256,
    pub price_total: U256,
    pub buyer: H160,
    pub seller: H160,
    pub offer_id: U256,
    pub log: Option<LogRef>,
}

/// Sale finished without being cancelled; says nothing about whether it sold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFinished {
    pub marketplace_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for SaleFinished {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "SaleFinished";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancelled {
    pub marketplace_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for Cancelled {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "CancelledSale";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub marketplace_id: U256,
    pub price: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for PriceUpdate {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "UpdatePrice";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            price: args.uint(1)?,
            log: args.log(),
        })
    }
}

/// Sale start moved later; `start_time` is seconds since the unix epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDelayed {
    pub marketplace_id: U256,
    pub start_time: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for StartDelayed {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "UpdateStartTime";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            start_time: args.uint(1)?,
            log: args.log(),
        })
    }
}

/// Sale end moved later; `end_time` is seconds since the unix epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationExtended {
    pub marketplace_id: U256,
    pub end_time: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for DurationExtended {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "UpdateEndTime";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            end_time: args.uint(1)?,
            log: args.log(),
        })
    }
}

/// A bid on an auction; refunds the previous highest bid
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
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
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

/// An offer over one or more NFTs
///
/// `marketplace_id` is `None` when the offer was made outside of any sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBundleOffer {
    pub offer_id: U256,
    pub marketplace_id: Option<U256>,
    pub nfts: Vec<H160>,
    pub token_ids: Vec<U256>,
    pub from: H160,
    pub price: U256,
    pub expires: U256,
    pub search_keywords: String,
    pub log: Option<LogRef>,
}

impl NewBundleOffer {
    pub fn is_sale_offer(&self) -> bool {
        self.marketplace_id.is_some()
    }
}

impl MarketplaceEvent for NewBundleOffer {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "NewOffer";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            marketplace_id: classify_offer(args.uint(1)?).marketplace_id(),
            nfts: args.address_array(2)?,
            token_ids: args.uint_array(3)?,
            from: args.address(4)?,
            price: args.uint(5)?,
            expires: args.uint(6)?,
            search_keywords: args.string(7)?,
            log: args.log(),
        })
    }
}

/// One NFT of an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub offer_id: U256,
    pub marketplace_id: Option<U256>,
    pub collection: H160,
    pub token_id: U256,
    pub from: H160,
    pub price: U256,
    pub expires: U256,
    pub log: Option<LogRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRemoved {
    pub offer_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for OfferRemoved {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "OfferRemoved";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferAccepted {
    pub offer_id: U256,
    pub marketplace_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for OfferAccepted {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "OfferAccepted";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            marketplace_id: args.uint(1)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRejected {
    pub offer_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for OfferRejected {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "OfferRejected";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferUpdated {
    pub offer_id: U256,
    pub new_price: U256,
    pub expires: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for OfferUpdated {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V3;
    const EVENT_NAME: &'static str = "UpdateOffer";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            new_price: args.uint(1)?,
            expires: args.uint(2)?,
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
    /// Per unit; the reserve price for auctions
    pub price: U256,
    pub start_time: U256,
    pub end_time: U256,
    pub max_bid: U256,
    pub max_bidder: H160,
    pub is_auction: bool,
    pub amount: U256,
    pub amount_remaining: U256,
    pub payment_token: H160,
    pub complete: bool,
    pub dev_fee_percentage: U256,
    pub dev_fee_fnft_percentage: U256,
    /// Zero address when no vault is involved
    pub vault: H160,
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
            max_bid: d.uint(7)?,
            max_bidder: d.address(8)?,
            is_auction: d.boolean(9)?,
            amount: d.uint(10)?,
            amount_remaining: d.uint(11)?,
            payment_token: d.address(12)?,
            complete: d.boolean(13)?,
            dev_fee_percentage: d.uint(14)?,
            dev_fee_fnft_percentage: d.uint(15)?,
            vault: d.address(16)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethabi::Token;

    fn uint(value: u64) -> Token {
        Token::Uint(U256::from(value))
    }

    #[test]
    fn test_bundle_listing_price_total() {
        let args = EventArgs::from_tokens(
            "NewSale",
            vec![
                uint(5),
                Token::Array(vec![Token::Address(H160::repeat_byte(1))]),
                Token::Array(vec![uint(9)]),
                Token::Array(vec![uint(1)]),
                uint(250),
                uint(3600),
                Token::Bool(false),
                uint(4),
                Token::Bool(true),
                Token::String("cats".into()),
                Token::Array(vec![]),
                Token::Address(H160::repeat_byte(2)),
            ],
        );

        let listing = NewBundleListing::from_args(args).unwrap();
        assert_eq!(listing.price_per_unit, U256::from(250));
        assert_eq!(listing.price_total, U256::from(1000));
        assert!(listing.is_nsfw);
        assert_eq!(listing.seller, H160::repeat_byte(2));
        assert!(listing.log.is_none());
    }

    #[test]
    fn test_price_total_saturates() {
        let args = EventArgs::from_tokens(
            "Sold",
            vec![
                uint(1),
                Token::Array(vec![]),
                Token::Array(vec![]),
                Token::Array(vec![]),
                Token::Uint(U256::MAX),
                Token::Address(H160::zero()),
                Token::Address(H160::zero()),
                uint(2),
                uint(0),
            ],
        );

        let sold = BundleSold::from_args(args).unwrap();
        assert_eq!(sold.price_total, U256::MAX);
    }

    #[test]
    fn test_offer_outside_sale_has_no_marketplace_id() {
        let tokens = |marketplace_id: u64| {
            vec![
                uint(77),
                uint(marketplace_id),
                Token::Array(vec![Token::Address(H160::repeat_byte(3))]),
                Token::Array(vec![uint(12)]),
                Token::Address(H160::repeat_byte(4)),
                uint(1000),
                uint(1_700_000_000),
                Token::String(String::new()),
            ]
        };

        let standalone =
            NewBundleOffer::from_args(EventArgs::from_tokens("NewOffer", tokens(0))).unwrap();
        assert_eq!(standalone.marketplace_id, None);
        assert!(!standalone.is_sale_offer());

        let on_sale =
            NewBundleOffer::from_args(EventArgs::from_tokens("NewOffer", tokens(42))).unwrap();
        assert_eq!(on_sale.marketplace_id, Some(U256::from(42)));
        assert!(on_sale.is_sale_offer());
    }
}
