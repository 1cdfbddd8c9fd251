//! Event signature helpers
//!
//! Topic-0 hashes are derived from the schema tables rather than hardcoded,
//! so a field change in a table moves the signature with it.

use web3::types::{Filter, FilterBuilder, H160, H256};

use crate::abi::MarketplaceVersion;

/// Topic-0 hash of every event a version emits, in table order
pub fn event_signatures(version: MarketplaceVersion) -> Vec<H256> {
    version.events().iter().map(|schema| schema.signature()).collect()
}

/// Filter matching any marketplace event emitted by `address`
pub fn all_events_filter(version: MarketplaceVersion, address: H160) -> Filter {
    FilterBuilder::default()
        .address(vec![address])
        .topics(Some(event_signatures(version)), None, None, None)
        .build()
}

/// Convert H256 to hex string with 0x prefix
pub fn to_hex_string(hash: H256) -> String {
    format!("0x{:x}", hash)
}
