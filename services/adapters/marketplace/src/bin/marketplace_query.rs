//! Marketplace Query
//!
//! Read-only calls against one marketplace version: sale details, the latest
//! sale id and the next acceptable bid.

use anyhow::Context;
use clap::Parser;
use marketplace::{
    format_ether, parse_address, HttpClient, MarketplaceV1, MarketplaceV2, MarketplaceV3,
    MarketplaceVersion,
};
use marketplace_config::{deployments, load_settings, SALE_URL_BASE};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;
use web3::types::U256;

#[derive(Parser)]
#[command(name = "marketplace_query")]
#[command(about = "Query sale details from a marketplace contract")]
struct Args {
    /// Settings file (TOML); built-in deployments are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Marketplace version (v1, v2, v3); defaults to the configured version
    #[arg(short, long)]
    marketplace: Option<MarketplaceVersion>,

    /// HTTP endpoint, overriding the configured one
    #[arg(long)]
    rpc: Option<String>,

    /// Sale to query; defaults to a known sale (v1, v2) or the latest one (v3)
    #[arg(short, long)]
    sale_id: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn print_latest(next: U256) -> U256 {
    let current = next.saturating_sub(U256::one());
    println!(
        "The latest sale on the marketplace is ID {} : {}{}",
        current, SALE_URL_BASE, current
    );
    current
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref()).context("Failed to load settings")?;

    // Initialize logging
    let level = if args.debug { "debug" } else { settings.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let version = match args.marketplace {
        Some(version) => version,
        None => settings.version.parse()?,
    };
    let label = version.to_string();
    let endpoint = settings
        .endpoint(&label)
        .with_context(|| format!("No endpoint configured for {}", version))?;
    let currency = deployments::for_version(&label)
        .map(|deployment| deployment.currency)
        .unwrap_or("ETH");
    let address = parse_address(&endpoint.address)?;
    let url = args.rpc.unwrap_or_else(|| endpoint.rpc_http.clone());

    info!("Querying {} marketplace {:?} via {}", version, address, url);
    let client = Arc::new(HttpClient::new(&url)?);

    match version {
        MarketplaceVersion::V1 => {
            let marketplace = MarketplaceV1::with_address(client, address);
            print_latest(marketplace.get_next_marketplace_id().await?);

            let sale_id = U256::from(args.sale_id.unwrap_or(deployments::samples::V1_SALE_ID));
            let details = marketplace.get_sale_details(sale_id).await?;
            println!(
                "Sale details for sale {}:\n{}",
                sale_id,
                serde_json::to_string_pretty(&details)?
            );
        }
        MarketplaceVersion::V2 => {
            let marketplace = MarketplaceV2::with_address(client, address);

            let sale_id = U256::from(args.sale_id.unwrap_or(deployments::samples::V2_SALE_ID));
            let details = marketplace.get_sale_details(sale_id).await?;
            println!(
                "Sale details for sale {}:\n{}",
                sale_id,
                serde_json::to_string_pretty(&details)?
            );

            let next = marketplace.get_next_minimum_bid_or_offer(sale_id).await?;
            println!(
                "Next minimum bid or offer for sale {}: {} ${}",
                sale_id,
                format_ether(next),
                currency
            );
        }
        MarketplaceVersion::V3 => {
            let marketplace = MarketplaceV3::with_address(client, address);
            let latest = print_latest(marketplace.get_next_marketplace_id().await?);

            let sale_id = args.sale_id.map(U256::from).unwrap_or(latest);
            let details = marketplace.get_sale_details(sale_id).await?;
            println!(
                "Sale details for sale {}:\n{}",
                sale_id,
                serde_json::to_string_pretty(&details)?
            );

            let next = marketplace.get_next_minimum_bid(sale_id).await?;
            println!(
                "Next minimum bid for sale {}: {} ${}",
                sale_id,
                format_ether(next),
                currency
            );
        }
    }

    Ok(())
}
