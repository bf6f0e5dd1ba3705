//! Price unit conversion.
//!
//! The CLI accepts prices in decimal SOL; the program wants lamports.  The
//! conversion is exact string arithmetic at the fixed 10⁹ scale — never a
//! float multiply, which silently loses sub-lamport precision.

use crate::error::{Error, Result};

pub use solana_sdk::native_token::LAMPORTS_PER_SOL;

/// Parse a decimal SOL string into lamports.
///
/// `"2.5"` → `2_500_000_000`, `"0.000000001"` → `1`.  At most nine fractional
/// digits are accepted; anything finer than a lamport is rejected rather than
/// truncated.
pub fn parse_sol(input: &str) -> Result<u64> {
    let invalid = |reason: &str| Error::InvalidAmount {
        input:  input.to_string(),
        reason: reason.to_string(),
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(invalid("empty amount"));
    }
    if s.starts_with('-') || s.starts_with('+') {
        return Err(invalid("amount must be a plain non-negative decimal"));
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("no digits"));
    }
    if frac.len() > 9 {
        return Err(invalid("at most 9 decimal places (1 lamport) are supported"));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| invalid("whole part is not a number"))?
    };
    // Right-pad the fraction to 9 digits: ".5" is 500_000_000 lamports.
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}")
            .parse()
            .map_err(|_| invalid("fractional part is not a number"))?
    };

    whole
        .checked_mul(LAMPORTS_PER_SOL)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| invalid("amount overflows u64 lamports"))
}

/// Lamports → SOL for display.
pub fn format_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_and_fractional_amounts() {
        assert_eq!(parse_sol("1").unwrap(), 1_000_000_000);
        assert_eq!(parse_sol("1.0").unwrap(), 1_000_000_000);
        assert_eq!(parse_sol("2.5").unwrap(), 2_500_000_000);
        assert_eq!(parse_sol("0.25").unwrap(), 250_000_000);
        assert_eq!(parse_sol(".5").unwrap(), 500_000_000);
        assert_eq!(parse_sol("0").unwrap(), 0);
    }

    #[test]
    fn one_lamport_resolution() {
        assert_eq!(parse_sol("0.000000001").unwrap(), 1);
        assert_eq!(parse_sol("1.000000001").unwrap(), 1_000_000_001);
    }

    #[test]
    fn exactness_where_floats_drift() {
        // 0.1 is not representable in binary floating point; string math is.
        assert_eq!(parse_sol("0.1").unwrap(), 100_000_000);
        assert_eq!(parse_sol("123.456789123").unwrap(), 123_456_789_123);
    }

    #[test]
    fn sub_lamport_precision_is_rejected() {
        assert!(matches!(
            parse_sol("0.0000000001"),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn malformed_amounts_are_rejected() {
        for bad in ["", ".", "-1", "+1", "abc", "1.2.3", "1e9", "1,5"] {
            assert!(
                matches!(parse_sol(bad), Err(Error::InvalidAmount { .. })),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn overflow_is_rejected() {
        // u64::MAX lamports is 18_446_744_073.709551615 SOL exactly.
        assert_eq!(parse_sol("18446744073.709551615").unwrap(), u64::MAX);
        assert!(matches!(
            parse_sol("18446744073.709551616"),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_sol("99999999999999999999"),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn format_round_trip_for_display() {
        assert_eq!(format_sol(2_500_000_000), 2.5);
        assert_eq!(format_sol(0), 0.0);
    }
}
