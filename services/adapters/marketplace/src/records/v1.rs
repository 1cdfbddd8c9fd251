//! Marketplace V1 records
//!
//! Listings here are single collection/token pairs, so there is nothing to
//! split. Offers come in four shapes: on a sale, on a token, on a whole
//! collection, and on a filtered set of a collection's tokens.

use serde::{Deserialize, Serialize};
use web3::types::{H160, U256};

use crate::abi::{DecodingError, EventArgs, LogRef, MarketplaceEvent, MarketplaceVersion};
use crate::offer::classify_offer;

/// `Listing` struct as passed to the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub nft: H160,
    pub token_id: U256,
    pub price: U256,
    pub duration: U256,
    pub amount: U256,
    pub is_using_vault: bool,
    pub is_auction: bool,
    pub is_antisnipe: bool,
    pub is_flash_auction: bool,
    pub is_nsfw: bool,
    pub search_keywords: String,
    pub donation_address: H160,
    pub donation_percent: U256,
}

impl Listing {
    fn from_args(args: &EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            nft: args.address(0)?,
            token_id: args.uint(1)?,
            price: args.uint(2)?,
            duration: args.uint(3)?,
            amount: args.uint(4)?,
            is_using_vault: args.boolean(5)?,
            is_auction: args.boolean(6)?,
            is_antisnipe: args.boolean(7)?,
            is_flash_auction: args.boolean(8)?,
            is_nsfw: args.boolean(9)?,
            search_keywords: args.string(10)?,
            donation_address: args.address(11)?,
            donation_percent: args.uint(12)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub marketplace_id: U256,
    pub listing: Listing,
    pub seller: H160,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for NewListing {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "NewListing";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            listing: Listing::from_args(&args.tuple(1)?)?,
            seller: args.address(2)?,
            log: args.log(),
        })
    }
}

/// Several listings created in one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListingBatch {
    pub first_marketplace_id: U256,
    pub listings: Vec<Listing>,
    pub seller: H160,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for NewListingBatch {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "NewListingBatch";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        let listings = args
            .tuple_array(1)?
            .iter()
            .map(Listing::from_args)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            first_marketplace_id: args.uint(0)?,
            listings,
            seller: args.address(2)?,
            log: args.log(),
        })
    }
}

/// A completed sale; `offer_id` is set when an offer was accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sold {
    pub marketplace_id: U256,
    pub price: U256,
    pub buyer: H160,
    pub amount: U256,
    pub offer_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for Sold {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "Sold";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            price: args.uint(1)?,
            buyer: args.address(2)?,
            amount: args.uint(3)?,
            offer_id: args.uint(4)?,
            log: args.log(),
        })
    }
}

/// Sale finished without being cancelled; says nothing about whether it sold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFinished {
    pub marketplace_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for SaleFinished {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
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
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
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
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "UpdatePrice";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            marketplace_id: args.uint(0)?,
            price: args.uint(1)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationExtended {
    pub marketplace_id: U256,
    pub end_time: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for DurationExtended {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
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
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
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

/// An offer on a sale or a single token
///
/// `marketplace_id` is `None` when the offer was made outside of any sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub offer_id: U256,
    pub marketplace_id: Option<U256>,
    pub nft: H160,
    pub token_id: U256,
    pub from: H160,
    pub quantity: U256,
    pub price: U256,
    pub expires: U256,
    pub search_keywords: String,
    pub log: Option<LogRef>,
}

impl NewOffer {
    pub fn is_sale_offer(&self) -> bool {
        self.marketplace_id.is_some()
    }
}

impl MarketplaceEvent for NewOffer {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "NewOffer";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            marketplace_id: classify_offer(args.uint(1)?).marketplace_id(),
            nft: args.address(2)?,
            token_id: args.uint(3)?,
            from: args.address(4)?,
            quantity: args.uint(5)?,
            price: args.uint(6)?,
            expires: args.uint(7)?,
            search_keywords: args.string(8)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRemoved {
    pub offer_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for OfferRemoved {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
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
    pub nft: H160,
    pub token_id: U256,
    pub quantity: U256,
    pub marketplace_id: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for OfferAccepted {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "OfferAccepted";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            nft: args.address(1)?,
            token_id: args.uint(2)?,
            quantity: args.uint(3)?,
            marketplace_id: args.uint(4)?,
            log: args.log(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferUpdated {
    pub offer_id: U256,
    pub nft: H160,
    pub token_id: U256,
    pub quantity: U256,
    pub new_price: U256,
    pub expires: U256,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for OfferUpdated {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "UpdateOffer";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            nft: args.address(1)?,
            token_id: args.uint(2)?,
            quantity: args.uint(3)?,
            new_price: args.uint(4)?,
            expires: args.uint(5)?,
            log: args.log(),
        })
    }
}

/// An offer on any token of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollectionOffer {
    pub offer_id: U256,
    pub nft: H160,
    pub from: H160,
    pub quantity: U256,
    pub price: U256,
    pub expires: U256,
    pub search_keywords: String,
    pub log: Option<LogRef>,
}

impl MarketplaceEvent for NewCollectionOffer {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "NewCollectionOffer";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            nft: args.address(1)?,
            from: args.address(2)?,
            quantity: args.uint(3)?,
            price: args.uint(4)?,
            expires: args.uint(5)?,
            search_keywords: args.string(6)?,
            log: args.log(),
        })
    }
}

/// An offer on specific tokens of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFilteredCollectionOffer {
    pub offer_id: U256,
    pub nft: H160,
    pub token_ids: Vec<U256>,
    pub from: H160,
    pub quantity: U256,
    /// Ignored when `prices` is populated
    pub price: U256,
    /// Per-token prices, when they differ
    pub prices: Vec<U256>,
    pub expires: U256,
    pub search_keywords: Vec<String>,
    pub log: Option<LogRef>,
}

impl NewFilteredCollectionOffer {
    /// Price offered for the token at `index` of `token_ids`
    pub fn price_for(&self, index: usize) -> U256 {
        self.prices.get(index).copied().unwrap_or(self.price)
    }
}

impl MarketplaceEvent for NewFilteredCollectionOffer {
    const VERSION: MarketplaceVersion = MarketplaceVersion::V1;
    const EVENT_NAME: &'static str = "NewFilteredCollectionOffer";

    fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        Ok(Self {
            offer_id: args.uint(0)?,
            nft: args.address(1)?,
            token_ids: args.uint_array(2)?,
            from: args.address(3)?,
            quantity: args.uint(4)?,
            price: args.uint(5)?,
            prices: args.uint_array(6)?,
            expires: args.uint(7)?,
            search_keywords: args.string_array(8)?,
            log: args.log(),
        })
    }
}

/// `getSaleDetails` result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    pub nft: H160,
    pub token_id: U256,
    pub end_time: U256,
    /// Per unit; the reserve price for auctions
    pub price: U256,
    pub seller: H160,
    pub is_auction: bool,
    pub auction_start_time: U256,
    pub highest_bid: U256,
    pub highest_bidder: H160,
    pub antisnipe: bool,
    pub flash_auction: bool,
    /// Zero address when there is no donation
    pub donation_address: H160,
    pub donation_percent: U256,
    pub amount_remaining: U256,
    /// Zero address when no vault is involved
    pub vault: H160,
}

impl SaleDetails {
    pub fn from_args(args: EventArgs) -> Result<Self, DecodingError> {
        let d = super::struct_components(args)?;
        Ok(Self {
            nft: d.address(0)?,
            token_id: d.uint(1)?,
            end_time: d.uint(2)?,
            price: d.uint(3)?,
            seller: d.address(4)?,
            is_auction: d.boolean(5)?,
            auction_start_time: d.uint(6)?,
            highest_bid: d.uint(7)?,
            highest_bidder: d.address(8)?,
            antisnipe: d.boolean(9)?,
            flash_auction: d.boolean(10)?,
            donation_address: d.address(11)?,
            donation_percent: d.uint(12)?,
            amount_remaining: d.uint(13)?,
            vault: d.address(14)?,
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

    fn listing_tuple(token_id: u64) -> Token {
        Token::Tuple(vec![
            Token::Address(H160::repeat_byte(0xab)),
            uint(token_id),
            uint(1_000),
            uint(86_400),
            uint(1),
            Token::Bool(false),
            Token::Bool(true),
            Token::Bool(true),
            Token::Bool(false),
            Token::Bool(false),
            Token::String("ghosts".into()),
            Token::Address(H160::zero()),
            uint(0),
        ])
    }

    #[test]
    fn test_new_listing_from_tuple() {
        let args = EventArgs::from_tokens(
            "NewListing",
            vec![uint(2), listing_tuple(44), Token::Address(H160::repeat_byte(0x01))],
        );
        let listing = NewListing::from_args(args).unwrap();

        assert_eq!(listing.marketplace_id, U256::from(2));
        assert_eq!(listing.listing.token_id, U256::from(44));
        assert!(listing.listing.is_auction);
        assert!(listing.listing.is_antisnipe);
        assert_eq!(listing.listing.search_keywords, "ghosts");
    }

    #[test]
    fn test_new_listing_batch() {
        let args = EventArgs::from_tokens(
            "NewListingBatch",
            vec![
                uint(10),
                Token::Array(vec![listing_tuple(1), listing_tuple(2), listing_tuple(3)]),
                Token::Address(H160::repeat_byte(0x01)),
            ],
        );
        let batch = NewListingBatch::from_args(args).unwrap();

        assert_eq!(batch.first_marketplace_id, U256::from(10));
        let ids: Vec<U256> = batch.listings.iter().map(|l| l.token_id).collect();
        assert_eq!(ids, vec![U256::from(1), U256::from(2), U256::from(3)]);
    }

    #[test]
    fn test_listing_with_wrong_component_type() {
        let args = EventArgs::from_tokens(
            "NewListing",
            vec![uint(2), uint(3), Token::Address(H160::zero())],
        );
        assert!(matches!(
            NewListing::from_args(args),
            Err(DecodingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_filtered_offer_price_for() {
        let offer = NewFilteredCollectionOffer {
            offer_id: U256::one(),
            nft: H160::zero(),
            token_ids: vec![U256::from(5), U256::from(6)],
            from: H160::zero(),
            quantity: U256::one(),
            price: U256::from(100),
            prices: vec![U256::from(120)],
            expires: U256::zero(),
            search_keywords: vec![],
            log: None,
        };

        assert_eq!(offer.price_for(0), U256::from(120));
        assert_eq!(offer.price_for(1), U256::from(100));
    }
}
