use ethers_core::types::U256;

pub const ETHER_DECIMALS: usize = 18;
pub const GWEI_DECIMALS: usize = 9;

/// Formats an integer amount of the smallest unit as a decimal with `decimals` places,
/// trimming trailing zeros. Exact for any `U256`.
pub fn format_units(value: U256, decimals: usize) -> String {
    let (whole, frac) = value.div_mod(U256::exp10(decimals));
    if frac.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{:0>width$}", frac.to_string(), width = decimals);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

pub fn format_gwei(wei: U256) -> String {
    format_units(wei, GWEI_DECIMALS)
}

/// `0x1234...abcd` style shortening used for node labels.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
