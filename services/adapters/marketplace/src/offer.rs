//! Sale offer vs. standalone offer
//!
//! Offer events always carry a marketplace id. The contracts write
//! [`NO_SALE_MARKETPLACE_ID`] there when the offer was made outside of an
//! active sale (a token or collection offer), and the id of the sale
//! otherwise.

use serde::{Deserialize, Serialize};
use web3::types::U256;

/// Marketplace id written by the contracts for offers made outside of a sale
pub const NO_SALE_MARKETPLACE_ID: U256 = U256::zero();

/// What an offer was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OfferTarget {
    Sale(U256),
    Standalone,
}

impl OfferTarget {
    pub fn is_sale_offer(&self) -> bool {
        matches!(self, Self::Sale(_))
    }

    pub fn marketplace_id(&self) -> Option<U256> {
        match self {
            Self::Sale(id) => Some(*id),
            Self::Standalone => None,
        }
    }
}

/// Classify an offer by the raw marketplace id from its event
pub fn classify_offer(raw_marketplace_id: U256) -> OfferTarget {
    if raw_marketplace_id == NO_SALE_MARKETPLACE_ID {
        OfferTarget::Standalone
    } else {
        OfferTarget::Sale(raw_marketplace_id)
    }
}
