//! Exact conversion of human-entered supply strings into base units.

use num_bigint::BigUint;

/// Convert a decimal string into base units (`value * 10^decimals`).
///
/// The computation splits on the decimal point and works digit-wise so
/// large supplies never round through binary floating point. Thousands
/// separators and surrounding whitespace are stripped. Excess fractional
/// digits are truncated, never rounded; missing ones are zero-padded.
/// Empty or non-numeric input yields zero.
pub fn parse_amount_to_base_units(value: &str, decimals: u8) -> BigUint {
    let sanitized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if sanitized.is_empty() {
        return BigUint::from(0u8);
    }

    let (whole, fraction) = sanitized
        .split_once('.')
        .unwrap_or((sanitized.as_str(), ""));
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return BigUint::from(0u8);
    }

    let mut padded = fraction.to_string();
    while padded.len() < decimals as usize {
        padded.push('0');
    }
    padded.truncate(decimals as usize);

    let whole_part = if whole.is_empty() {
        BigUint::from(0u8)
    } else {
        whole.parse().unwrap_or_default()
    };
    let fraction_part = if padded.is_empty() {
        BigUint::from(0u8)
    } else {
        padded.parse().unwrap_or_default()
    };

    whole_part * BigUint::from(10u8).pow(decimals as u32) + fraction_part
}
