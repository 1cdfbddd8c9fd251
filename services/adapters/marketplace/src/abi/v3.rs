//! Marketplace V3 schema table
//!
//! Bundle marketplace with per-unit pricing, offer ids on sales, delayed
//! starts, and offers that may or may not reference an active sale.

use super::{EventSchema, FieldKind as K, FieldSchema as F, FunctionSchema};

/// `getSaleDetails` return struct components
pub const SALE_DETAILS_FIELDS: &[F] = &[
    F::new("nfts", K::AddressArray),
    F::new("tokenIds", K::UintArray),
    F::new("amountBatches", K::UintArray),
    F::new("seller", K::Address),
    F::new("price", K::Uint),
    F::new("startTime", K::Uint),
    F::new("endTime", K::Uint),
    F::new("maxBid", K::Uint),
    F::new("maxBidder", K::Address),
    F::new("isAuction", K::Bool),
    F::new("amount", K::Uint),
    F::new("amountRemaining", K::Uint),
    F::new("paymentToken", K::Address),
    F::new("complete", K::Bool),
    F::new("devFeePercentage", K::Uint),
    F::new("devFeeFNFTPercentage", K::Uint),
    F::new("vault", K::Address),
];

pub const NEW_SALE: EventSchema = EventSchema {
    name: "NewSale",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("nfts", K::AddressArray),
        F::new("tokenIds", K::UintArray),
        F::new("amountBatches", K::UintArray),
        F::new("price", K::Uint),
        F::new("duration", K::Uint),
        F::new("isAuction", K::Bool),
        F::new("amount", K::Uint),
        F::new("isNSFW", K::Bool),
        F::new("searchKeywords", K::String),
        F::new("routerAddresses", K::AddressArray),
        F::new("seller", K::Address),
    ],
};

pub const SOLD: EventSchema = EventSchema {
    name: "Sold",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("nfts", K::AddressArray),
        F::new("tokenIds", K::UintArray),
        F::new("amountBatches", K::UintArray),
        F::new("price", K::Uint),
        F::new("buyer", K::Address),
        F::new("seller", K::Address),
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
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("nfts", K::AddressArray),
        F::new("tokenIds", K::UintArray),
        F::new("amountBatches", K::UintArray),
    ],
};

pub const UPDATE_PRICE: EventSchema = EventSchema {
    name: "UpdatePrice",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("price", K::Uint),
        F::new("nfts", K::AddressArray),
        F::new("tokenIds", K::UintArray),
    ],
};

pub const UPDATE_START_TIME: EventSchema = EventSchema {
    name: "UpdateStartTime",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("startTime", K::Uint),
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
        F::new("nfts", K::AddressArray),
        F::new("tokenIds", K::UintArray),
        F::new("from", K::Address),
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
        F::indexed("marketplaceId", K::Uint),
    ],
};

pub const OFFER_REJECTED: EventSchema = EventSchema {
    name: "OfferRejected",
    fields: &[F::indexed("offerId", K::Uint)],
};

pub const UPDATE_OFFER: EventSchema = EventSchema {
    name: "UpdateOffer",
    fields: &[
        F::indexed("offerId", K::Uint),
        F::new("newPrice", K::Uint),
        F::new("expires", K::Uint),
    ],
};

pub const EVENTS: &[EventSchema] = &[
    NEW_SALE,
    SOLD,
    SALE_FINISHED,
    CANCELLED_SALE,
    UPDATE_PRICE,
    UPDATE_START_TIME,
    UPDATE_END_TIME,
    NEW_BID,
    NEW_OFFER,
    OFFER_REMOVED,
    OFFER_ACCEPTED,
    OFFER_REJECTED,
    UPDATE_OFFER,
];

pub const GET_SALE_DETAILS: FunctionSchema = FunctionSchema {
    name: "getSaleDetails",
    inputs: &[F::new("marketplaceId", K::Uint)],
    outputs: &[F::new("details", K::Tuple(SALE_DETAILS_FIELDS))],
};

pub const NEXT_MINIMUM_BID: FunctionSchema = FunctionSchema {
    name: "nextMinimumBid",
    inputs: &[F::new("marketplaceId", K::Uint)],
    outputs: &[F::new("", K::Uint)],
};

pub const CURRENT_MARKETPLACE_ID: FunctionSchema = FunctionSchema {
    name: "currentMarketplaceId",
    inputs: &[],
    outputs: &[F::new("", K::Uint)],
};

pub const FUNCTIONS: &[FunctionSchema] =
    &[GET_SALE_DETAILS, NEXT_MINIMUM_BID, CURRENT_MARKETPLACE_ID];
