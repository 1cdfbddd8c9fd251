//! Marketplace V2 schema table
//!
//! Bundle marketplace: each sale carries parallel `nfts`/`tokenIds`/`amountBatches`
//! arrays and an aggregate bundle `amount`. Offers are always made against a sale.

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
    F::new("maxBidOrOffer", K::Uint),
    F::new("maxBidderOrOfferer", K::Address),
    F::new("isAuction", K::Bool),
    F::new("amount", K::Uint),
    F::new("amountRemaining", K::Uint),
    F::new("complete", K::Bool),
    F::new("devFeePercentage", K::Uint),
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
        F::new("marketplaceURI", K::String),
        F::new("searchKeywords", K::String),
        F::new("routerAddresses", K::AddressArray),
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
    ],
};

pub const SALE_FINISHED: EventSchema = EventSchema {
    name: "SaleFinished",
    fields: &[
        F::indexed("marketplaceId", K::Uint),
        F::new("nfts", K::AddressArray),
        F::new("tokenIds", K::UintArray),
        F::new("amountBatches", K::UintArray),
        F::new("failedSellAll", K::Bool),
    ],
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
        F::indexed("marketplaceId", K::Uint),
        F::new("offerrer", K::Address),
        F::new("offer", K::Uint),
        F::new("nextMinimum", K::Uint),
    ],
};

pub const EVENTS: &[EventSchema] = &[
    NEW_SALE,
    SOLD,
    SALE_FINISHED,
    CANCELLED_SALE,
    UPDATE_PRICE,
    UPDATE_END_TIME,
    NEW_BID,
    NEW_OFFER,
];

pub const GET_SALE_DETAILS: FunctionSchema = FunctionSchema {
    name: "getSaleDetails",
    inputs: &[F::new("marketplaceId", K::Uint)],
    outputs: &[F::new("details", K::Tuple(SALE_DETAILS_FIELDS))],
};

pub const NEXT_MINIMUM_BID_OR_OFFER: FunctionSchema = FunctionSchema {
    name: "nextMinimumBidOrOffer",
    inputs: &[F::new("marketplaceId", K::Uint)],
    outputs: &[F::new("", K::Uint)],
};

pub const FUNCTIONS: &[FunctionSchema] = &[GET_SALE_DETAILS, NEXT_MINIMUM_BID_OR_OFFER];
