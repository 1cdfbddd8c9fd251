//! Settings Module
//!
//! Layered settings for the marketplace adapter binaries:
//! built-in deployment defaults, then an optional TOML file, then
//! `MARKETPLACE_` environment variables (`MARKETPLACE_V2__RPC_WS=...`).

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::deployments::{self, Deployment};

/// Endpoints and contract address for one marketplace generation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    pub address: String,
    pub rpc_http: String,
    pub rpc_ws: String,
}

impl From<&Deployment> for EndpointSettings {
    fn from(deployment: &Deployment) -> Self {
        Self {
            address: deployment.address.to_string(),
            rpc_http: deployment.rpc_http.to_string(),
            rpc_ws: deployment.rpc_ws.to_string(),
        }
    }
}

/// Main settings structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MarketplaceSettings {
    /// Contract generation used when a driver is not told otherwise
    pub version: String,
    pub log_level: String,
    pub v1: EndpointSettings,
    pub v2: EndpointSettings,
    pub v3: EndpointSettings,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            version: deployments::V1.version.to_string(),
            log_level: "info".to_string(),
            v1: EndpointSettings::from(&deployments::V1),
            v2: EndpointSettings::from(&deployments::V2),
            v3: EndpointSettings::from(&deployments::V3),
        }
    }
}

impl MarketplaceSettings {
    /// Load settings from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default().to_toml()?;
        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(path) = path {
            info!("Loading marketplace settings: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("MARKETPLACE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let settings: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        debug!(version = %settings.version, "Marketplace settings loaded");
        Ok(settings)
    }

    /// Endpoints for a version label (`v1`, `V2`, `3`, ...)
    pub fn endpoint(&self, version: &str) -> Option<&EndpointSettings> {
        match deployments::for_version(version)?.version {
            "v1" => Some(&self.v1),
            "v2" => Some(&self.v2),
            "v3" => Some(&self.v3),
            _ => None,
        }
    }

    /// Endpoints for the configured default version
    pub fn active_endpoint(&self) -> Result<&EndpointSettings> {
        match self.endpoint(&self.version) {
            Some(endpoint) => Ok(endpoint),
            None => bail!("Unknown marketplace version: {}", self.version),
        }
    }

    /// Expand `${VAR}` references in addresses and URLs
    pub fn expand_env_vars(&mut self) -> Result<()> {
        for endpoint in [&mut self.v1, &mut self.v2, &mut self.v3] {
            endpoint.address = shellexpand::env(&endpoint.address)
                .context("Failed to expand contract address")?
                .to_string();
            endpoint.rpc_http = shellexpand::env(&endpoint.rpc_http)
                .context("Failed to expand HTTP RPC URL")?
                .to_string();
            endpoint.rpc_ws = shellexpand::env(&endpoint.rpc_ws)
                .context("Failed to expand WebSocket RPC URL")?
                .to_string();
        }

        Ok(())
    }

    /// Reject unknown versions, malformed addresses and wrong URL schemes
    pub fn validate(&self) -> Result<()> {
        if deployments::for_version(&self.version).is_none() {
            bail!("Unknown marketplace version: {}", self.version);
        }

        for (label, endpoint) in [("v1", &self.v1), ("v2", &self.v2), ("v3", &self.v3)] {
            let hex = endpoint.address.strip_prefix("0x").unwrap_or(&endpoint.address);
            if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("{label}: invalid contract address {}", endpoint.address);
            }
            if !(endpoint.rpc_http.starts_with("http://")
                || endpoint.rpc_http.starts_with("https://"))
            {
                bail!("{label}: rpc_http must be an http(s) URL, got {}", endpoint.rpc_http);
            }
            if !(endpoint.rpc_ws.starts_with("ws://") || endpoint.rpc_ws.starts_with("wss://")) {
                bail!("{label}: rpc_ws must be a ws(s) URL, got {}", endpoint.rpc_ws);
            }
        }

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize settings")
    }
}

/// Convenience function to load, expand and validate settings
pub fn load_settings(path: Option<&Path>) -> Result<MarketplaceSettings> {
    let mut settings = MarketplaceSettings::load(path)?;
    settings.expand_env_vars()?;
    settings.validate()?;
    Ok(settings)
}
