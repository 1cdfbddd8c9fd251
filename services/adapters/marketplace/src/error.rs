//! Error types for marketplace adapter operations

use thiserror::Error;

use crate::abi::{DecodingError, MarketplaceVersion};

/// Result type alias for marketplace operations
pub type Result<T> = std::result::Result<T, MarketplaceError>;

/// Main error type for marketplace operations
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Transport or node error, passed through unmodified
    #[error(transparent)]
    Rpc(#[from] web3::Error),

    /// Call data could not be encoded or return data decoded
    #[error(transparent)]
    Abi(#[from] ethabi::Error),

    /// Log or return value did not match the expected schema
    #[error(transparent)]
    Decoding(#[from] DecodingError),

    /// The transport cannot push logs (e.g. plain HTTP)
    #[error("Log subscriptions are not supported by the {transport} transport")]
    SubscriptionUnsupported {
        /// Transport name
        transport: &'static str,
    },

    /// Function not in the version's function table
    #[error("Function {function} is not part of the {version} contract")]
    UnknownFunction {
        /// Requested function
        function: String,
        /// Contract generation
        version: MarketplaceVersion,
    },

    /// Malformed contract address
    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),
}
