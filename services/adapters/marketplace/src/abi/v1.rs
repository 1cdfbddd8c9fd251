//! Marketplace V1 schema table
//!
//! The single-NFT marketplace: every listing is one collection/token pair
//! described by a `Listing` tuple. Offers can target a sale, a token, a whole
//! collection, or a filtered set of tokens.

use super::{EventSchema, FieldKind as K, FieldSchema as F, FunctionSchema};

/// `Listing` tuple components, in struct order
pub const LISTING_FIELDS: &[F] = &[
    F::new("nft", K::Address),
    F::new("tokenId", K::Uint),
    F::new("price", K::Uint),
    F::new("duration", K::Uint),
    F::new("amount", K::Uint),
    F::new("isUsingVault", K::Bool),
    F::new("isAuction", K::Bool),
    F::new("isAntisnipe", K::Bool),
    F::new("isFlashAuction", K::Bool),
    F::new("isNSFW", K::Bool),
    F::new("searchKeywords", K::String),
    F::new("donationAddress", K::Address),
    F::new("donationPercent", K::Uint),
];

/// `getSaleDetails` return struct components
pub const SALE_DETAILS_FIELDS: &[F] = &[
    F::new("nft", K::Address),
    F::new("tokenId", K::Uint),
    F::new("endTime", K::Uint),
    F::new("price", K::Uint),
    F::new("seller", K::Address),
    F::new("isAuction", K::Bool),
    F::new("auctionStartTime", K::Uint),
    F::new("highestBid", K::Uint),
    F::new("highestBidder", K::Address),
    F::new("antisnipe", K::Bool),
    F::new("flashAuction", K::Bool),
    F::new("donationAddress", K::Address),
    F::new("donationPercent", K::Uint),
    F::new("amountRemaining", K::Uint),
    F::new("vault", K::Address),
];

pub const NEW_LISTING: EventSchema = EventSchema {
    name: "NewListing",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("listing", K::Tuple(LISTING_FIELDS)),
        F::new("seller", K::Address),
    ],
};

pub const NEW_LISTING_BATCH: EventSchema = EventSchema {
    name: "NewListingBatch",
    fields: &[
        F::indexed("firstMarketplaceId", K::Uint),
        F::new("listings", K::TupleArray(LISTING_FIELDS)),
        F::new("seller", K::Address),
    ],
};

pub const SOLD: EventSchema = EventSchema {
    name: "Sold",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("price", K::Uint),
        F::new("buyer", K::Address),
        F::new("amount", K::Uint),
        F::new("offerId", K::Uint),
    ],
};

pub const SALE_FINISHED: EventSchema = EventSchema {
    name: "SaleFinished",
    fields: &[F::indexed("marketplaceId", K::Uint)],
};

pub const CANCELLED_SALE: EventSchema = EventSchema {
    name: "CancelledSale",
    fields: &[F::indexed("marketplaceId", K::Uint)],
};

pub const UPDATE_PRICE: EventSchema = EventSchema {
    name: "UpdatePrice",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("price", K::Uint),
    ],
};

pub const UPDATE_END_TIME: EventSchema = EventSchema {
    name: "UpdateEndTime",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("endTime", K::Uint),
    ],
};

pub const NEW_BID: EventSchema = EventSchema {
    name: "NewBid",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("bidder", K::Address),
        F::new("bid", K::Uint),
        F::new("nextMinimum", K::Uint),
    ],
};

pub const NEW_OFFER: EventSchema = EventSchema {
    name: "NewOffer",
    fields: &[
        F::indexed("offerId", K::Uint),
        F::indexed("marketplaceId", K::Uint),
        F::new("nft", K::Address),
        F::new("tokenId", K::Uint),
        F::new("from", K::Address),
        F::new("quantity", K::Uint),
        F::new("price", K::Uint),
        F::new("expires", K::Uint),
        F::new("searchKeywords", K::String),
    ],
};

pub const OFFER_REMOVED: EventSchema = EventSchema {
    name: "OfferRemoved",
    fields: &[F::indexed("offerId", K::Uint)],
};

pub const OFFER_ACCEPTED: EventSchema = EventSchema {
    name: "OfferAccepted",
    fields: &[
        F::indexed("offerId", K::Uint),
        F::new("nft", K::Address),
        F::new("tokenId", K::Uint),
        F::new("quantity", K::Uint),
        F::indexed("marketplaceId", K::Uint),
    ],
};

pub const UPDATE_OFFER: EventSchema = EventSchema {
    name: "UpdateOffer",
    fields: &[
        F::indexed("offerId", K::Uint),
        F::new("nft", K::Address),
        F::new("tokenId", K::Uint),
        F::new("quantity", K::Uint),
        F::new("newPrice", K::Uint),
        F::new("expires", K::Uint),
    ],
};

pub const NEW_COLLECTION_OFFER: EventSchema = EventSchema {
    name: "NewCollectionOffer",
    fields: &[
        F::indexed("offerId", K::Uint),
        F::new("nft", K::Address),
        F::new("from", K::Address),
        F::new("quantity", K::Uint),
        F::new("price", K::Uint),
        F::new("expires", K::Uint),
        F::new("searchKeywords", K::String),
    ],
};

pub const NEW_FILTERED_COLLECTION_OFFER: EventSchema = EventSchema {
    name: "NewFilteredCollectionOffer",
    fields: &[
        F::indexed("offerId", K::Uint),
        F::new("nft", K::Address),
        F::new("tokenIds", K::UintArray),
        F::new("from", K::Address),
        F::new("quantity", K::Uint),
        F::new("price", K::Uint),
        F::new("prices", K::UintArray),
        F::new("expires", K::Uint),
        F::new("searchKeywords", K::StringArray),
    ],
};

pub const EVENTS: &[EventSchema] = &[
    NEW_LISTING,
    NEW_LISTING_BATCH,
    SOLD,
    SALE_FINISHED,
    CANCELLED_SALE,
    UPDATE_PRICE,
    UPDATE_END_TIME,
    NEW_BID,
    NEW_OFFER,
    OFFER_REMOVED,
    OFFER_ACCEPTED,
    UPDATE_OFFER,
    NEW_COLLECTION_OFFER,
    NEW_FILTERED_COLLECTION_OFFER,
];

pub const GET_SALE_DETAILS: FunctionSchema = FunctionSchema {
    name: "getSaleDetails",
    inputs: &[F::new("marketplaceId", K::Uint)],
    outputs: &[F::new("details", K::Tuple(SALE_DETAILS_FIELDS))],
};

pub const CURRENT_MARKETPLACE_ID: FunctionSchema = FunctionSchema {
    name: "currentMarketplaceId",
    inputs: &[],
    outputs: &[F::new("", K::Uint)],
};

pub const FUNCTIONS: &[FunctionSchema] = &[GET_SALE_DETAILS, CURRENT_MARKETPLACE_ID];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_offer_abi_structure() {
        let event = NEW_OFFER.event();

        assert_eq!(event.name, "NewOffer");
        assert_eq!(event.inputs.len(), 9);
        assert_eq!(event.inputs[0].name, "offerId");
        assert_eq!(event.inputs[1].name, "marketplaceId");
        assert_eq!(event.inputs[8].name, "searchKeywords");

        assert!(event.inputs[0].indexed);
        assert!(event.inputs[1].indexed);
        assert!(!event.inputs[2].indexed);
    }

    #[test]
    fn test_listing_tuple_order() {
        assert_eq!(NEW_LISTING.position("listing"), Some(1));
        assert_eq!(LISTING_FIELDS[0].name, "nft");
        assert_eq!(LISTING_FIELDS[12].name, "donationPercent");
    }

    #[test]
    fn test_no_dynamic_indexed_fields() {
        // Indexed dynamic types are hashed into the topic and cannot be decoded back
        for schema in EVENTS {
            for field in schema.fields.iter().filter(|f| f.indexed) {
                assert!(
                    matches!(field.kind, K::Uint | K::Address | K::Bool),
                    "{}.{} is indexed but dynamic",
                    schema.name,
                    field.name
                );
            }
        }
    }
}
