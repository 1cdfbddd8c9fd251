//! Marketplace Listener
//!
//! Subscribes to every event of one marketplace version over WebSocket and
//! prints each record as it arrives.

use anyhow::Context;
use clap::Parser;
use marketplace::{
    parse_address, MarketplaceV1, MarketplaceV2, MarketplaceV3, MarketplaceVersion, WsClient,
};
use marketplace_config::load_settings;
use serde::Serialize;
use std::{fmt::Debug, path::PathBuf, sync::Arc};
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marketplace_listen")]
#[command(about = "Print marketplace events as they happen")]
struct Args {
    /// Settings file (TOML); built-in deployments are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Marketplace version (v1, v2, v3); defaults to the configured version
    #[arg(short, long)]
    marketplace: Option<MarketplaceVersion>,

    /// WebSocket endpoint, overriding the configured one
    #[arg(long)]
    ws: Option<String>,

    /// Deliver bundles as emitted instead of one record per NFT (v2, v3)
    #[arg(long)]
    bundles: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn print<T: Serialize + Debug>(title: &str, record: &T) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => println!("{}\n{}", title, json),
        Err(_) => println!("{}\n{:?}", title, record),
    }
}

async fn listen_v1(marketplace: MarketplaceV1<WsClient>) -> anyhow::Result<Vec<JoinHandle<()>>> {
    Ok(vec![
        marketplace.on_new_listing(|sale| print("New listing!", &sale)).await?,
        marketplace.on_new_listing_batch(|sales| print("New listing batch!", &sales)).await?,
        marketplace.on_sold(|sale| print("Sold!", &sale)).await?,
        marketplace.on_finished(|sale| print("Finished sale", &sale)).await?,
        marketplace.on_cancelled(|sale| print("Cancelled sale", &sale)).await?,
        marketplace.on_price_update(|sale| print("Price updated", &sale)).await?,
        marketplace
            .on_duration_extended(|extension| print("Auction duration extended", &extension))
            .await?,
        marketplace.on_new_bid(|bid| print("New bid", &bid)).await?,
        marketplace
            .on_new_offer(|offer, is_sale_offer| {
                print(&format!("New offer (on a sale? {})", is_sale_offer), &offer)
            })
            .await?,
        marketplace.on_offer_removed(|offer| print("Offer removed", &offer)).await?,
        marketplace.on_offer_accepted(|offer| print("Offer accepted", &offer)).await?,
        marketplace.on_offer_updated(|offer| print("Offer updated", &offer)).await?,
        marketplace
            .on_new_collection_offer(|offer| print("New collection offer", &offer))
            .await?,
        marketplace
            .on_new_filtered_collection_offer(|offer| print("New filtered collection offer", &offer))
            .await?,
    ])
}

async fn listen_v2(
    marketplace: MarketplaceV2<WsClient>,
    bundles: bool,
) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let mut handles = if bundles {
        vec![
            marketplace.on_new_sale_as_bundle(|sale| print("New listing!", &sale)).await?,
            marketplace.on_sold_as_bundle(|sale| print("Sold!", &sale)).await?,
            marketplace
                .on_unsold_as_bundle(|sale, cancelled| {
                    print(if cancelled { "Cancelled sale" } else { "Failed to sell" }, &sale)
                })
                .await?,
        ]
    } else {
        vec![
            marketplace.on_new_sale(|sale| print("New listing!", &sale)).await?,
            marketplace.on_sold(|sale| print("Sold!", &sale)).await?,
            marketplace
                .on_unsold(|sale, cancelled| {
                    print(if cancelled { "Cancelled sale" } else { "Failed to sell" }, &sale)
                })
                .await?,
        ]
    };

    handles.extend([
        marketplace.on_price_update(|sale| print("Price updated", &sale)).await?,
        marketplace
            .on_duration_extended(|extension| print("Auction duration extended", &extension))
            .await?,
        marketplace.on_new_bid(|bid| print("New bid", &bid)).await?,
        marketplace.on_new_offer(|offer| print("New offer", &offer)).await?,
    ]);
    Ok(handles)
}

async fn listen_v3(
    marketplace: MarketplaceV3<WsClient>,
    bundles: bool,
) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let mut handles = if bundles {
        vec![
            marketplace.on_new_listing_as_bundle(|sale| print("New listing!", &sale)).await?,
            marketplace.on_sold_as_bundle(|sale| print("Sold!", &sale)).await?,
            marketplace
                .on_new_offer_as_bundle(|offer, is_sale_offer| {
                    print(&format!("New offer (on a sale? {})", is_sale_offer), &offer)
                })
                .await?,
        ]
    } else {
        vec![
            marketplace.on_new_listing(|sale| print("New listing!", &sale)).await?,
            marketplace.on_sold(|sale| print("Sold!", &sale)).await?,
            marketplace
                .on_new_offer(|offer, is_sale_offer| {
                    print(&format!("New offer (on a sale? {})", is_sale_offer), &offer)
                })
                .await?,
        ]
    };

    handles.extend([
        marketplace.on_finished(|sale| print("Finished sale", &sale)).await?,
        marketplace.on_cancelled(|sale| print("Cancelled sale", &sale)).await?,
        marketplace.on_price_update(|sale| print("Price updated", &sale)).await?,
        marketplace.on_start_delayed(|sale| print("Start delayed", &sale)).await?,
        marketplace
            .on_duration_extended(|extension| print("Auction duration extended", &extension))
            .await?,
        marketplace.on_new_bid(|bid| print("New bid", &bid)).await?,
        marketplace.on_offer_removed(|offer| print("Offer removed", &offer)).await?,
        marketplace.on_offer_accepted(|offer| print("Offer accepted", &offer)).await?,
        marketplace.on_offer_rejected(|offer| print("Offer rejected", &offer)).await?,
        marketplace.on_offer_updated(|offer| print("Offer updated", &offer)).await?,
    ]);
    Ok(handles)
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
    let endpoint = settings
        .endpoint(&version.to_string())
        .with_context(|| format!("No endpoint configured for {}", version))?;
    let address = parse_address(&endpoint.address)?;
    let url = args.ws.unwrap_or_else(|| endpoint.rpc_ws.clone());

    info!("Starting {} marketplace listener for {:?}", version, address);
    let client = Arc::new(
        WsClient::connect(&url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?,
    );

    let handles = match version {
        MarketplaceVersion::V1 => listen_v1(MarketplaceV1::with_address(client, address)).await?,
        MarketplaceVersion::V2 => {
            listen_v2(MarketplaceV2::with_address(client, address), args.bundles).await?
        }
        MarketplaceVersion::V3 => {
            listen_v3(MarketplaceV3::with_address(client, address), args.bundles).await?
        }
    };
    info!("Listening with {} subscriptions", handles.len());

    // Keep running until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");

    for handle in handles {
        handle.abort();
    }

    Ok(())
}
