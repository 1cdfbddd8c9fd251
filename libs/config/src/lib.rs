//! # Marketplace Configuration
//!
//! Deployment constants and runtime settings for the marketplace adapter.
//!
//! ## Features
//!
//! - **Deployments**: Contract addresses and public RPC endpoints per version
//! - **Settings**: Defaults overridden by a TOML file and `MARKETPLACE_` env vars
//!
//! ## Usage
//!
//! ```rust
//! use marketplace_config::{deployments, MarketplaceSettings};
//!
//! let v2 = deployments::for_version("v2").unwrap();
//! assert_eq!(v2.chain, "fantom");
//!
//! let settings = MarketplaceSettings::default();
//! assert_eq!(settings.v2.address, v2.address);
//! ```

pub mod deployments;
pub mod settings;

// Re-export commonly used types
pub use deployments::{Deployment, SALE_URL_BASE};
pub use settings::{load_settings, EndpointSettings, MarketplaceSettings};
