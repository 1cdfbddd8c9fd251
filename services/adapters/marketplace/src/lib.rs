//! NFT marketplace adapter library
//!
//! Typed access to the three generations of the marketplace contracts:
//! live event subscriptions, historical log queries and read-only calls,
//! with bundle events split into per-NFT records.
//!
//! # Architecture
//!
//! ```text
//! services/adapters/marketplace/
//! ├── abi/        # Per-version event/function schema tables and the decoder
//! │   ├── events.rs      # EventDecoder, EventArgs, DecodingError
//! │   └── v1.rs, v2.rs, v3.rs
//! ├── records/    # Typed records per version
//! ├── split.rs    # Bundle -> per-NFT records
//! ├── offer.rs    # Sale offer vs standalone offer
//! ├── client.rs   # ChainClient seam (WebSocket / HTTP)
//! ├── contract.rs # Decoded subscriptions, queries and calls
//! ├── facade/     # MarketplaceV1 / V2 / V3
//! └── units.rs    # Wei formatting
//! ```
//!
//! # Design Principles
//! - One decoder driven by per-version schema tables
//! - Amounts and prices stay `U256` end to end
//! - Every record keeps a reference to the log it came from

pub mod abi;
pub mod client;
pub mod contract;
pub mod error;
pub mod event_signatures;
pub mod facade;
pub mod offer;
pub mod records;
pub mod split;
pub mod units;

// Re-export commonly used types
pub use abi::{
    get_all_event_signatures, DecodingError, EventArgs, EventDecoder, LogRef, MarketplaceEvent,
    MarketplaceVersion,
};
pub use client::{ChainClient, HttpClient, WsClient};
pub use contract::{parse_address, MarketplaceContract};
pub use error::{MarketplaceError, Result};
pub use event_signatures::{all_events_filter, event_signatures, to_hex_string};
pub use facade::{MarketplaceV1, MarketplaceV2, MarketplaceV3};
pub use offer::{classify_offer, OfferTarget, NO_SALE_MARKETPLACE_ID};
pub use split::{V2BundleSplitter, V3BundleSplitter};
pub use units::format_ether;
