//! Input validation and unit conversion.
//!
//! Amount conversion multiplies in `f64` before flooring.
//! With small decimal counts this is exact for realistic inputs; with large
//! ones values near a decimal boundary can floor one base unit low.

use alloy::primitives::{Address, U256};

use crate::transfer::types::Amount;

/// Whether `s` is a syntactically valid address.
///
/// 40 hex digits with an optional `0x` prefix. Single-case input is accepted
/// as-is; mixed case must carry a valid EIP-55 checksum.
pub fn is_valid_address(s: &str) -> bool {
    parse_address(s).is_some()
}

/// Parse an address under the rules of [`is_valid_address`].
pub fn parse_address(s: &str) -> Option<Address> {
    let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(format!("0x{}", hex), None).ok();
    }

    hex.parse().ok()
}

/// Numeric value of an amount, if it is a finite number.
pub fn amount_value(amount: &Amount) -> Option<f64> {
    let value = match amount {
        Amount::Number(n) => n.as_f64()?,
        Amount::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Whether an amount is a finite decimal strictly greater than zero.
pub fn is_valid_amount(amount: &Amount) -> bool {
    amount_value(amount).is_some_and(|v| v > 0.0)
}

/// `floor(amount × 10^decimals)` as an integer base-unit value.
///
/// Returns `None` for negative, non-finite, or out-of-range results.
pub fn to_base_units(amount: f64, decimals: u8) -> Option<U256> {
    let scaled = (amount * 10f64.powi(decimals as i32)).floor();
    U256::try_from(scaled).ok()
}

/// `raw / 10^decimals` for display.
pub fn from_base_units(raw: U256, decimals: u8) -> f64 {
    f64::from(raw) / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn amount(v: serde_json::Value) -> Amount {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_valid_amounts() {
        assert!(is_valid_amount(&amount(json!(0.01))));
        assert!(is_valid_amount(&amount(json!(100))));
        assert!(is_valid_amount(&amount(json!("0.01"))));
        assert!(is_valid_amount(&amount(json!(" 2.5 "))));
    }

    #[test]
    fn test_invalid_amounts() {
        for bad in [
            json!("abc"),
            json!(0),
            json!(-1),
            json!("NaN"),
            json!("Infinity"),
            json!("-inf"),
            json!("12abc"),
            json!(""),
        ] {
            assert!(!is_valid_amount(&amount(bad.clone())), "{} accepted", bad);
        }
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(1.00, 2), Some(U256::from(100u64)));
        assert_eq!(to_base_units(0.01, 2), Some(U256::from(1u64)));
        assert_eq!(to_base_units(123.456, 2), Some(U256::from(12345u64)));
        assert_eq!(to_base_units(0.001, 2), Some(U256::ZERO));
        assert_eq!(to_base_units(-1.0, 2), None);
    }

    #[test]
    fn test_to_base_units_large_values_are_exact() {
        assert_eq!(
            to_base_units(1e30, 0),
            Some(U256::from(1_000_000_000_000_000_019_884_624_838_656u128))
        );
        assert_eq!(to_base_units(1e300, 18), None);
        assert_eq!(to_base_units(f64::NAN, 2), None);
        assert_eq!(to_base_units(f64::INFINITY, 2), None);
    }

    #[test]
    fn test_float_precision_hazard() {
        // 1.005 is stored as 1.00499999999999989..., so the floor drops a unit.
        assert_eq!(to_base_units(1.005, 2), Some(U256::from(100u64)));
        // 0.29 * 100 = 28.999999999999996 in f64.
        assert_eq!(to_base_units(0.29, 2), Some(U256::from(28u64)));
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(U256::from(250u64), 2), 2.5);
        assert_eq!(from_base_units(U256::ZERO, 2), 0.0);
        assert_eq!(from_base_units(U256::from(1u64), 0), 1.0);
        assert_eq!(from_base_units(U256::from(1u64) << 200, 0), 2f64.powi(200));
    }

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address("0x742d35cc6634c0532925a3b8d44268d9c8c16c99"));
        assert!(is_valid_address("742d35cc6634c0532925a3b8d44268d9c8c16c99"));
        assert!(is_valid_address("0x742D35CC6634C0532925A3B8D44268D9C8C16C99"));
        assert!(is_valid_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_invalid_addresses() {
        // too short / too long
        assert!(!is_valid_address("0x742d35cc6634c0532925a3b8d44268d9c8c16c9"));
        assert!(!is_valid_address("0x742d35cc6634c0532925a3b8d44268d9c8c16c990"));
        // non-hex
        assert!(!is_valid_address("0x742d35cc6634c0532925a3b8d44268d9c8c16cgg"));
        // mixed case with a broken checksum
        assert!(!is_valid_address("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_valid_address(""));
    }
}
