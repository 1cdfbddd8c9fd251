//! Marketplace deployments
//!
//! Contract addresses and public endpoints of each marketplace generation.
//! V1 is the current contract (Sonic); V2 and V3 are the earlier bundle
//! contracts on Fantom.

/// One deployed marketplace contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// Version label, as accepted by the adapter (`v1`, `v2`, `v3`)
    pub version: &'static str,
    /// Chain the contract lives on
    pub chain: &'static str,
    /// Native currency symbol of the chain
    pub currency: &'static str,
    pub address: &'static str,
    pub rpc_http: &'static str,
    pub rpc_ws: &'static str,
}

pub const V1: Deployment = Deployment {
    version: "v1",
    chain: "sonic",
    currency: "S",
    address: "0xeb8E5876Eb79c628929944dDf3521Ad893d57827",
    rpc_http: "https://rpc.soniclabs.com",
    rpc_ws: "wss://rpc.soniclabs.com",
};

pub const V2: Deployment = Deployment {
    version: "v2",
    chain: "fantom",
    currency: "FTM",
    address: "0x6125fD14b6790d5F66509B7aa53274c93dAE70B9",
    rpc_http: "https://rpc.ftm.tools/",
    rpc_ws: "wss://wsapi.fantom.network/",
};

pub const V3: Deployment = Deployment {
    version: "v3",
    chain: "fantom",
    currency: "FTM",
    address: "0xC21da4686569Bb9Edf6e00C4c4b214B58b728d6B",
    rpc_http: "https://rpc.ftm.tools/",
    rpc_ws: "wss://wsapi.fantom.network/",
};

pub const ALL: [Deployment; 3] = [V1, V2, V3];

/// Public page of a sale: `<SALE_URL_BASE><marketplace id>`
pub const SALE_URL_BASE: &str = "https://paintswap.finance/marketplace/";

/// Look up a deployment by version label (`v1`, `V2`, `3`, ...)
pub fn for_version(label: &str) -> Option<&'static Deployment> {
    let label = label.trim().to_ascii_lowercase();
    let label = label.strip_prefix('v').unwrap_or(&label);
    ALL.iter()
        .find(|deployment| deployment.version.trim_start_matches('v') == label)
}

/// Values used by the sample drivers
pub mod samples {
    /// Block range with V1 listing activity
    pub const FILTER_FROM_BLOCK: u64 = 22_081_860;
    pub const FILTER_TO_BLOCK: u64 = 22_081_870;

    /// Sale ids with known details
    pub const V1_SALE_ID: u64 = 2;
    pub const V2_SALE_ID: u64 = 68_897;
}
