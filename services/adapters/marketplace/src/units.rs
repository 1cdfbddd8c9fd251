//! Wei formatting for display

use web3::types::U256;

const ETHER_DECIMALS: usize = 18;

/// Format a wei amount as ether with trailing zeros trimmed (`1.5`, `2.0`)
pub fn format_ether(wei: U256) -> String {
    let unit = U256::exp10(ETHER_DECIMALS);
    let whole = wei / unit;
    let fraction = format!("{:0>width$}", (wei % unit).to_string(), width = ETHER_DECIMALS);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::zero()), "0.0");
        assert_eq!(format_ether(U256::exp10(18)), "1.0");
        assert_eq!(format_ether(U256::from(1_500_000_000_000_000_000u64)), "1.5");
        assert_eq!(format_ether(U256::one()), "0.000000000000000001");
        assert_eq!(format_ether(U256::exp10(21) + U256::exp10(15)), "1000.001");
    }
}
