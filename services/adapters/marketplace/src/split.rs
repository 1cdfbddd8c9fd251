//! Bundle splitting
//!
//! Bundle events describe N co-listed NFTs through parallel
//! `nfts`/`tokenIds`/`amountBatches` arrays plus an aggregate `amount` (the
//! number of bundles). Splitting yields one record per NFT with
//! `amount = bundle.amount * amountBatches[i]`.
//!
//! Prices:
//! - V2 prorates the bundle price by each NFT's share of one bundle and
//!   divides by the bundle count:
//!   `price_i = price * batch_i / (sum(batches) * amount)`, floored.
//! - V3 carries the bundle's price fields through unchanged.
//!
//! Arrays are walked in lockstep and the walk ends at the shortest one.
//! Bundles with more than one NFT are not produced by the live contracts
//! today, but the arithmetic holds for any N.

use ethereum_types::U512;
use web3::types::{H160, U256};

use crate::records::{v2, v3};

/// One NFT position of a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Item {
    collection: H160,
    token_id: U256,
    amount_per_bundle_unit: U256,
}

fn items<'a>(
    nfts: &'a [H160],
    token_ids: &'a [U256],
    amount_batches: &'a [U256],
) -> impl Iterator<Item = Item> + 'a {
    nfts.iter()
        .zip(token_ids)
        .zip(amount_batches)
        .map(|((collection, token_id), batch)| Item {
            collection: *collection,
            token_id: *token_id,
            amount_per_bundle_unit: *batch,
        })
}

/// Total amount of one NFT across all bundles
///
/// Clamps to `U256::MAX` when the product overflows 256 bits. The contracts
/// bound `amount` and `amountBatches` far below that, so a clamped value
/// only shows up for payloads no deployment emits.
pub fn item_amount(bundle_amount: U256, amount_per_bundle_unit: U256) -> U256 {
    bundle_amount.saturating_mul(amount_per_bundle_unit)
}

/// `price * batch / (batch_sum * amount)` in 512-bit precision, floored
///
/// A zero divisor yields zero. The quotient never exceeds `price` while
/// `batch <= batch_sum` and `amount >= 1`, so the 256-bit narrowing is exact
/// for any bundle built by the splitters.
pub fn prorate_price(price: U256, batch: U256, batch_sum: U256, amount: U256) -> U256 {
    let divisor = batch_sum.full_mul(amount);
    if divisor.is_zero() {
        return U256::zero();
    }

    let quotient: U512 = price.full_mul(batch) / divisor;
    U256::try_from(quotient).unwrap_or(U256::MAX)
}

fn batch_sum(amount_batches: &[U256]) -> U256 {
    amount_batches
        .iter()
        .fold(U256::zero(), |sum, batch| sum.saturating_add(*batch))
}

/// Splitter for V2 bundles (ratio-prorated prices)
pub struct V2BundleSplitter;

impl V2BundleSplitter {
    pub fn split_bundle_sold(bundle: &v2::BundleSold) -> Vec<v2::Sold> {
        let sum = batch_sum(&bundle.amount_batches);
        items(&bundle.nfts, &bundle.token_ids, &bundle.amount_batches)
            .map(|item| v2::Sold {
                marketplace_id: bundle.marketplace_id,
                collection: item.collection,
                token_id: item.token_id,
                amount_in_bundle: item.amount_per_bundle_unit,
                amount: item_amount(bundle.amount, item.amount_per_bundle_unit),
                price: prorate_price(bundle.price, item.amount_per_bundle_unit, sum, bundle.amount),
                buyer: bundle.buyer,
                seller: bundle.seller,
                log: bundle.log.clone(),
            })
            .collect()
    }

    pub fn split_bundle_new_sale(bundle: &v2::NewBundleSale) -> Vec<v2::NewSale> {
        let sum = batch_sum(&bundle.amount_batches);
        items(&bundle.nfts, &bundle.token_ids, &bundle.amount_batches)
            .map(|item| v2::NewSale {
                marketplace_id: bundle.marketplace_id,
                collection: item.collection,
                token_id: item.token_id,
                amount_in_bundle: item.amount_per_bundle_unit,
                amount: item_amount(bundle.amount, item.amount_per_bundle_unit),
                price: prorate_price(bundle.price, item.amount_per_bundle_unit, sum, bundle.amount),
                duration: bundle.duration,
                is_auction: bundle.is_auction,
                is_nsfw: bundle.is_nsfw,
                log: bundle.log.clone(),
            })
            .collect()
    }

    pub fn split_bundle_unsold(bundle: &v2::BundleUnsold) -> Vec<v2::Unsold> {
        items(&bundle.nfts, &bundle.token_ids, &bundle.amount_batches)
            .map(|item| v2::Unsold {
                marketplace_id: bundle.marketplace_id,
                collection: item.collection,
                token_id: item.token_id,
                amount_in_bundle: item.amount_per_bundle_unit,
                log: bundle.log.clone(),
            })
            .collect()
    }
}

/// Splitter for V3 bundles (prices carried through)
pub struct V3BundleSplitter;

impl V3BundleSplitter {
    pub fn split_bundle_sold(bundle: &v3::BundleSold) -> Vec<v3::Sold> {
        items(&bundle.nfts, &bundle.token_ids, &bundle.amount_batches)
            .map(|item| v3::Sold {
                marketplace_id: bundle.marketplace_id,
                collection: item.collection,
                token_id: item.token_id,
                amount_per_bundle_unit: item.amount_per_bundle_unit,
                amount: item_amount(bundle.amount, item.amount_per_bundle_unit),
                price_per_unit: bundle.price_per_unit,
                price_total: bundle.price_total,
                buyer: bundle.buyer,
                seller: bundle.seller,
                offer_id: bundle.offer_id,
                log: bundle.log.clone(),
            })
            .collect()
    }

    pub fn split_bundle_new_listing(bundle: &v3::NewBundleListing) -> Vec<v3::NewListing> {
        items(&bundle.nfts, &bundle.token_ids, &bundle.amount_batches)
            .map(|item| v3::NewListing {
                marketplace_id: bundle.marketplace_id,
                collection: item.collection,
                token_id: item.token_id,
                amount_per_bundle_unit: item.amount_per_bundle_unit,
                amount: item_amount(bundle.amount, item.amount_per_bundle_unit),
                price_per_unit: bundle.price_per_unit,
                price_total: bundle.price_total,
                duration: bundle.duration,
                is_auction: bundle.is_auction,
                is_nsfw: bundle.is_nsfw,
                seller: bundle.seller,
                log: bundle.log.clone(),
            })
            .collect()
    }

    /// Offers have no `amountBatches`; only collection and token are split out
    pub fn split_bundle_new_offer(bundle: &v3::NewBundleOffer) -> Vec<v3::NewOffer> {
        bundle
            .nfts
            .iter()
            .zip(&bundle.token_ids)
            .map(|(collection, token_id)| v3::NewOffer {
                offer_id: bundle.offer_id,
                marketplace_id: bundle.marketplace_id,
                collection: *collection,
                token_id: *token_id,
                from: bundle.from,
                price: bundle.price,
                expires: bundle.expires,
                log: bundle.log.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(value: u64) -> U256 {
        U256::from(value)
    }

    fn v2_sold(amount: u64, batches: &[u64], price: U256) -> v2::BundleSold {
        v2::BundleSold {
            marketplace_id: u(68897),
            nfts: batches.iter().map(|_| H160::repeat_byte(0x42)).collect(),
            token_ids: (0..batches.len() as u64).map(u).collect(),
            amount_batches: batches.iter().copied().map(u).collect(),
            price,
            buyer: H160::repeat_byte(0xb0),
            seller: H160::repeat_byte(0x5e),
            amount: u(amount),
            log: None,
        }
    }

    #[test]
    fn test_v2_ratio_split() {
        let items = V2BundleSplitter::split_bundle_sold(&v2_sold(10, &[3, 7], u(100)));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].amount, u(30));
        assert_eq!(items[1].amount, u(70));
        // 100 * 3 / (10 * 10) and 100 * 7 / (10 * 10)
        assert_eq!(items[0].price, u(3));
        assert_eq!(items[1].price, u(7));
        assert_eq!(items[0].amount_in_bundle, u(3));
        assert_eq!(items[1].buyer, H160::repeat_byte(0xb0));
    }

    #[test]
    fn test_v2_prorate_floors() {
        let items = V2BundleSplitter::split_bundle_sold(&v2_sold(1, &[1, 2], u(100)));
        assert_eq!(items[0].price, u(33));
        assert_eq!(items[1].price, u(66));
    }

    #[test]
    fn test_v2_single_item_is_unit_price() {
        let items = V2BundleSplitter::split_bundle_sold(&v2_sold(4, &[1], u(1000)));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, u(4));
        assert_eq!(items[0].price, u(250));
        assert_eq!(items[0].marketplace_id, u(68897));
    }

    #[test]
    fn test_v2_no_overflow_on_large_price() {
        let items = V2BundleSplitter::split_bundle_sold(&v2_sold(1, &[1, 1], U256::MAX));
        assert_eq!(items[0].price, U256::MAX / 2);
    }

    #[test]
    fn test_v2_zero_divisor_gives_zero_price() {
        let items = V2BundleSplitter::split_bundle_sold(&v2_sold(0, &[3], u(100)));
        assert_eq!(items[0].price, U256::zero());
        assert_eq!(items[0].amount, U256::zero());

        let items = V2BundleSplitter::split_bundle_sold(&v2_sold(5, &[0, 0], u(100)));
        assert!(items.iter().all(|item| item.price.is_zero()));
    }

    #[test]
    fn test_empty_bundle() {
        assert!(V2BundleSplitter::split_bundle_sold(&v2_sold(10, &[], u(100))).is_empty());
    }

    #[test]
    fn test_mismatched_arrays_stop_at_shortest() {
        let mut bundle = v2_sold(2, &[1, 1, 1], u(90));
        bundle.token_ids.truncate(2);
        let items = V2BundleSplitter::split_bundle_sold(&bundle);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_v2_unsold_split() {
        let bundle = v2::BundleUnsold {
            marketplace_id: u(7),
            nfts: vec![H160::repeat_byte(1), H160::repeat_byte(2)],
            token_ids: vec![u(10), u(20)],
            amount_batches: vec![u(1), u(5)],
            log: None,
        };
        let items = V2BundleSplitter::split_bundle_unsold(&bundle);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].collection, H160::repeat_byte(2));
        assert_eq!(items[1].amount_in_bundle, u(5));
    }

    #[test]
    fn test_v3_prices_carried_through() {
        let bundle = v3::BundleSold {
            marketplace_id: u(1),
            nfts: vec![H160::repeat_byte(1), H160::repeat_byte(2)],
            token_ids: vec![u(10), u(20)],
            amount_batches: vec![u(2), u(3)],
            amount: u(4),
            price_per_unit: u(50),
            price_total: u(200),
            buyer: H160::zero(),
            seller: H160::zero(),
            offer_id: u(9),
            log: None,
        };

        let items = V3BundleSplitter::split_bundle_sold(&bundle);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].amount, u(8));
        assert_eq!(items[1].amount, u(12));
        for item in &items {
            assert_eq!(item.price_per_unit, u(50));
            assert_eq!(item.price_total, u(200));
            assert_eq!(item.offer_id, u(9));
        }
    }

    #[test]
    fn test_v2_new_sale_split() {
        let bundle = v2::NewBundleSale {
            marketplace_id: u(12),
            nfts: vec![H160::repeat_byte(1), H160::repeat_byte(2)],
            token_ids: vec![u(10), u(20)],
            amount_batches: vec![u(3), u(7)],
            price: u(100),
            duration: u(60),
            is_auction: true,
            amount: u(10),
            is_nsfw: true,
            marketplace_uri: String::new(),
            search_keywords: "pair".to_string(),
            router_addresses: vec![],
            log: None,
        };

        let items = V2BundleSplitter::split_bundle_new_sale(&bundle);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].amount, u(30));
        assert_eq!(items[1].amount, u(70));
        assert_eq!(items[0].price, u(3));
        assert_eq!(items[1].price, u(7));
        assert_eq!(items[1].collection, H160::repeat_byte(2));
        assert_eq!(items[1].token_id, u(20));
        assert_eq!(items[1].amount_in_bundle, u(7));
        for item in &items {
            assert_eq!(item.marketplace_id, u(12));
            assert_eq!(item.duration, u(60));
            assert!(item.is_auction);
            assert!(item.is_nsfw);
        }
    }

    #[test]
    fn test_v3_new_listing_split() {
        let bundle = v3::NewBundleListing {
            marketplace_id: u(4),
            nfts: vec![H160::repeat_byte(1), H160::repeat_byte(2)],
            token_ids: vec![u(10), u(20)],
            amount_batches: vec![u(2), u(5)],
            amount: u(4),
            price_per_unit: u(25),
            price_total: u(100),
            duration: u(3600),
            is_auction: false,
            is_nsfw: true,
            search_keywords: String::new(),
            router_addresses: vec![],
            seller: H160::repeat_byte(9),
            log: None,
        };

        let items = V3BundleSplitter::split_bundle_new_listing(&bundle);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].amount, u(8));
        assert_eq!(items[1].amount, u(20));
        assert_eq!(items[1].amount_per_bundle_unit, u(5));
        assert_eq!(items[0].collection, H160::repeat_byte(1));
        for item in &items {
            assert_eq!(item.price_per_unit, u(25));
            assert_eq!(item.price_total, u(100));
            assert_eq!(item.duration, u(3600));
            assert!(!item.is_auction);
            assert!(item.is_nsfw);
            assert_eq!(item.seller, H160::repeat_byte(9));
        }
    }

    #[test]
    fn test_item_amount_clamps_on_overflow() {
        assert_eq!(item_amount(U256::MAX, u(2)), U256::MAX);
        assert_eq!(item_amount(u(3), u(7)), u(21));
    }

    #[test]
    fn test_v3_offer_split() {
        let bundle = v3::NewBundleOffer {
            offer_id: u(3),
            marketplace_id: None,
            nfts: vec![H160::repeat_byte(1)],
            token_ids: vec![u(77)],
            from: H160::repeat_byte(9),
            price: u(1000),
            expires: u(1_700_000_000),
            search_keywords: String::new(),
            log: None,
        };

        let offers = V3BundleSplitter::split_bundle_new_offer(&bundle);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].token_id, u(77));
        assert_eq!(offers[0].marketplace_id, None);
        assert_eq!(offers[0].price, u(1000));
    }
}
