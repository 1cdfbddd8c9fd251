//! Marketplace Filter
//!
//! Replays past V1 events over a block range instead of waiting for new
//! ones. Handy for checking decoding against known activity.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use marketplace::{parse_address, HttpClient, MarketplaceV1};
use marketplace_config::{deployments::samples, load_settings};
use serde::Serialize;
use std::{fmt::Debug, path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;
use web3::types::BlockNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EventKind {
    NewListings,
    NewListingBatches,
    NewOffers,
    CollectionOffers,
    FilteredCollectionOffers,
    RemovedOffers,
    AcceptedOffers,
    Finished,
}

#[derive(Parser)]
#[command(name = "marketplace_filter")]
#[command(about = "Print past V1 marketplace events from a block range")]
struct Args {
    /// Settings file (TOML); built-in deployments are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP endpoint, overriding the configured one
    #[arg(long)]
    rpc: Option<String>,

    #[arg(long, default_value_t = samples::FILTER_FROM_BLOCK)]
    from_block: u64,

    #[arg(long, default_value_t = samples::FILTER_TO_BLOCK)]
    to_block: u64,

    /// Events to retrieve; repeat to retrieve several
    #[arg(short, long, value_enum, default_values_t = [EventKind::NewListings])]
    event: Vec<EventKind>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn print_all<T: Serialize + Debug>(title: &str, records: &[T]) {
    for record in records {
        match serde_json::to_string_pretty(record) {
            Ok(json) => println!("{}:\n{}\n", title, json),
            Err(_) => println!("{}:\n{:?}\n", title, record),
        }
    }
}

async fn retrieve(
    marketplace: &MarketplaceV1<HttpClient>,
    kind: EventKind,
    from: BlockNumber,
    to: BlockNumber,
) -> anyhow::Result<usize> {
    let count = match kind {
        EventKind::NewListings => {
            let listings = marketplace.query_new_listings(from, to).await?;
            print_all("Listing", &listings);
            listings.len()
        }
        EventKind::NewListingBatches => {
            let batches = marketplace.query_new_listing_batches(from, to).await?;
            print_all("Listings", &batches);
            batches.len()
        }
        EventKind::NewOffers => {
            let offers = marketplace.query_new_offers(from, to).await?;
            for (offer, is_sale_offer) in &offers {
                print_all(&format!("Offer (on a sale? {})", is_sale_offer), std::slice::from_ref(offer));
            }
            offers.len()
        }
        EventKind::CollectionOffers => {
            let offers = marketplace.query_new_collection_offers(from, to).await?;
            print_all("New collection offer", &offers);
            offers.len()
        }
        EventKind::FilteredCollectionOffers => {
            let offers = marketplace.query_new_filtered_collection_offers(from, to).await?;
            print_all("New filtered collection offer", &offers);
            offers.len()
        }
        EventKind::RemovedOffers => {
            let offers = marketplace.query_offers_removed(from, to).await?;
            print_all("Removed offer", &offers);
            offers.len()
        }
        EventKind::AcceptedOffers => {
            let offers = marketplace.query_offers_accepted(from, to).await?;
            print_all("Accepted offer", &offers);
            offers.len()
        }
        EventKind::Finished => {
            let sales = marketplace.query_finished(from, to).await?;
            print_all("Sale finished", &sales);
            sales.len()
        }
    };
    Ok(count)
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

    anyhow::ensure!(
        args.from_block <= args.to_block,
        "from-block {} is after to-block {}",
        args.from_block,
        args.to_block
    );

    let address = parse_address(&settings.v1.address)?;
    let url = args.rpc.unwrap_or_else(|| settings.v1.rpc_http.clone());
    let client = Arc::new(HttpClient::new(&url)?);
    let marketplace = MarketplaceV1::with_address(client, address);

    let from = BlockNumber::Number(args.from_block.into());
    let to = BlockNumber::Number(args.to_block.into());
    info!("Filtering blocks {}..={} via {}", args.from_block, args.to_block, url);

    for kind in args.event {
        let count = retrieve(&marketplace, kind, from, to)
            .await
            .with_context(|| format!("Failed to retrieve {:?}", kind))?;
        println!("{} {:?} events seen through filter", count, kind);
    }

    Ok(())
}
