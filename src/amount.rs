/// Fixed-precision amount parsing and string/hex utilities
///
/// Amounts are carried as 256-bit unsigned integers in the asset's smallest
/// unit. Parsing truncates (never rounds) fractional digits beyond the
/// asset's precision and scales short fractions up to full precision.
use alloy_primitives::{ Address, U256 };

use crate::errors::EngineError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Parse a decimal numeral string into a scaled integer at `decimals` precision
///
/// Scan is left to right: digits accumulate as result*10 + digit, at most one
/// decimal point is permitted, and fractional digits past `decimals` are read
/// but not accumulated (truncation). Fewer fractional digits than `decimals`
/// scales the result up by the missing powers of ten. Empty input is zero.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, EngineError> {
    let ten = U256::from(10u8);
    let mut result = U256::ZERO;
    let mut seen_point = false;
    let mut fraction_digits: u32 = 0;

    for ch in input.chars() {
        match ch {
            '.' => {
                if seen_point {
                    return Err(EngineError::InvalidCharacter(ch));
                }
                seen_point = true;
            }
            '0'..='9' => {
                if seen_point {
                    if fraction_digits >= decimals as u32 {
                        // Past the asset's precision: truncate, never round
                        break;
                    }
                    fraction_digits += 1;
                }
                let digit = U256::from((ch as u8) - b'0');
                result = result
                    .checked_mul(ten)
                    .and_then(|r| r.checked_add(digit))
                    .ok_or(EngineError::Overflow)?;
            }
            other => {
                return Err(EngineError::InvalidCharacter(other));
            }
        }
    }

    let scale = (decimals as u32) - fraction_digits;
    if scale > 0 {
        let factor = ten.checked_pow(U256::from(scale)).ok_or(EngineError::Overflow)?;
        result = result.checked_mul(factor).ok_or(EngineError::Overflow)?;
    }

    Ok(result)
}

/// Standard base-10 rendering of an unsigned integer, no leading zeros
pub fn to_decimal_string(value: U256) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let ten = U256::from(10u8);
    let mut digits = Vec::new();
    let mut v = value;
    while !v.is_zero() {
        let d: u8 = (v % ten).to::<u8>();
        digits.push(b'0' + d);
        v /= ten;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Render a scaled integer back into display units, trimming the fraction
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 || (decimals as usize) > 77 {
        return to_decimal_string(amount);
    }
    let base = U256::from(10u8).pow(U256::from(decimals));
    let whole = amount / base;
    let frac = amount % base;
    if frac.is_zero() {
        return to_decimal_string(whole);
    }
    let mut frac_str = format!("{:0>width$}", to_decimal_string(frac), width = decimals as usize);
    while frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{}.{}", to_decimal_string(whole), frac_str)
}

/// Lowercase hex string to binary; odd-length input is malformed
pub fn hex_to_bytes(input: &str) -> Result<Vec<u8>, EngineError> {
    let raw = input.strip_prefix("0x").unwrap_or(input);
    if raw.len() % 2 != 0 {
        return Err(EngineError::InvalidSyntax(format!("odd-length hex string '{}'", input)));
    }
    let mut out = Vec::with_capacity(raw.len() / 2);
    for pair in raw.as_bytes().chunks(2) {
        let hi = hex_value(pair[0])?;
        let lo = hex_value(pair[1])?;
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

fn hex_value(c: u8) -> Result<u8, EngineError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        other =>
            Err(EngineError::InvalidSyntax(format!("invalid hex character '{}'", other as char))),
    }
}

/// Binary to fixed-size account identifier; takes the trailing 20 bytes of a
/// word, input shorter than the identifier width is malformed
pub fn bytes_to_address(bytes: &[u8]) -> Result<Address, EngineError> {
    if bytes.len() < 20 {
        return Err(
            EngineError::InvalidSyntax(
                format!("account identifier needs 20 bytes, got {}", bytes.len())
            )
        );
    }
    Ok(Address::from_slice(&bytes[bytes.len() - 20..]))
}

/// Canonical lowercase hex text form of an account identifier
pub fn address_to_hex(address: Address) -> String {
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for byte in address.as_slice() {
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_whole() {
        assert_eq!(parse_amount("20", 18).unwrap(), U256::from(20u64) * U256::from(10u64).pow(U256::from(18u64)));
    }

    #[test]
    fn test_parse_amount_scales_short_fraction() {
        // 20.2 at 18 decimals = 20200000000000000000
        let expected = U256::from_str_radix("20200000000000000000", 10).unwrap();
        assert_eq!(parse_amount("20.2", 18).unwrap(), expected);
    }

    #[test]
    fn test_parse_amount_truncates_excess_fraction() {
        // Truncation, never rounding
        assert_eq!(parse_amount("20.23345", 4).unwrap(), parse_amount("20.2334", 4).unwrap());
        assert_eq!(parse_amount("0.99999", 2).unwrap(), U256::from(99u64));
    }

    #[test]
    fn test_parse_amount_fraction_only() {
        assert_eq!(parse_amount(".5", 2).unwrap(), U256::from(50u64));
    }

    #[test]
    fn test_parse_amount_empty_is_zero() {
        assert_eq!(parse_amount("", 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_amount_rejects_bad_character() {
        assert_eq!(parse_amount("12a.5", 6), Err(EngineError::InvalidCharacter('a')));
    }

    #[test]
    fn test_parse_amount_rejects_second_point() {
        assert_eq!(parse_amount("1.2.3", 6), Err(EngineError::InvalidCharacter('.')));
    }

    #[test]
    fn test_parse_amount_zero_precision_truncates_all_fraction() {
        assert_eq!(parse_amount("5.9", 0).unwrap(), U256::from(5u64));
    }

    #[test]
    fn test_format_units_trims_trailing_zeros() {
        let amount = parse_amount("20.2", 18).unwrap();
        assert_eq!(format_units(amount, 18), "20.2");
        let whole = parse_amount("1", 18).unwrap();
        assert_eq!(format_units(whole, 18), "1");
    }

    #[test]
    fn test_format_units_pads_small_fraction() {
        // 5 base units at 6 decimals = 0.000005
        assert_eq!(format_units(U256::from(5u64), 6), "0.000005");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(to_decimal_string(U256::ZERO), "0");
        assert_eq!(to_decimal_string(U256::from(1234567890u64)), "1234567890");
    }

    #[test]
    fn test_hex_to_bytes_rejects_odd_length() {
        assert!(matches!(hex_to_bytes("abc"), Err(EngineError::InvalidSyntax(_))));
    }

    #[test]
    fn test_hex_to_bytes_rejects_bad_digit() {
        assert!(matches!(hex_to_bytes("zz"), Err(EngineError::InvalidSyntax(_))));
    }

    #[test]
    fn test_hex_round_trip() {
        let bytes = hex_to_bytes("0x1c0aa8ccccccccccccccccccccccccccccccca20").unwrap();
        let address = bytes_to_address(&bytes).unwrap();
        assert_eq!(address_to_hex(address), "0x1c0aa8ccccccccccccccccccccccccccccccca20");
    }

    #[test]
    fn test_bytes_to_address_rejects_short_input() {
        assert!(matches!(bytes_to_address(&[0u8; 19]), Err(EngineError::InvalidSyntax(_))));
    }

    #[test]
    fn test_bytes_to_address_takes_word_tail() {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&[0x11u8; 20]);
        let address = bytes_to_address(&word).unwrap();
        assert_eq!(address.as_slice(), &[0x11u8; 20]);
    }
}
