/// Round `value` to `decimals` places.
///
/// The exact binary value is rounded, with exact ties going to the even
/// digit, so a reading such as `5.0 - 4.875` gives `0.12` and not `0.13`.
///
/// # Examples
///
/// ```
/// use level_core::formatting::round_to;
///
/// assert_eq!(round_to(1.234, 2), 1.23);
/// assert_eq!(round_to(-0.456, 2), -0.46);
/// assert_eq!(round_to(0.125, 2), 0.12);
/// assert_eq!(round_to(2.0, 2), 2.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    // Fixed-precision formatting rounds the exact value half-to-even.
    format!("{:.prec$}", value, prec = decimals as usize)
        .parse()
        .unwrap_or(value)
}

/// Format a level or configuration value for display and export.
///
/// Uses the shortest representation that reads back to the same number. Finite
/// values keep a decimal point (`10.0`), and very large or small magnitudes use
/// a signed two-digit exponent (`1e+16`, `1.5e-05`).
///
/// # Examples
///
/// ```
/// use level_core::formatting::format_level;
///
/// assert_eq!(format_level(10.0), "10.0");
/// assert_eq!(format_level(-0.5), "-0.5");
/// assert_eq!(format_level(0.12), "0.12");
/// assert_eq!(format_level(1e16), "1e+16");
/// assert_eq!(format_level(f64::INFINITY), "inf");
/// ```
pub fn format_level(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    // Debug keeps the trailing ".0" that Display drops.
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            Err(_) => repr,
        },
        None => repr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── round_to ─────────────────────────────────────────────────────────────

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(5.0 - 4.876, 2), 0.12);
        assert_eq!(round_to(10.0 - 10.5, 2), -0.5);
    }

    #[test]
    fn test_round_to_exact_ties_go_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_round_to_uses_exact_binary_value() {
        // 5.0 - 4.165 is stored just below 0.835.
        assert_eq!(round_to(5.0 - 4.165, 2), 0.83);
        assert_eq!(round_to(5.0 - 4.665, 2), 0.33);
    }

    #[test]
    fn test_round_to_zero_places() {
        assert_eq!(round_to(2.6, 0), 3.0);
        assert_eq!(round_to(-2.6, 0), -3.0);
    }

    #[test]
    fn test_round_to_keeps_exact_values() {
        assert_eq!(round_to(0.0, 2), 0.0);
        assert_eq!(round_to(1.25, 2), 1.25);
    }

    // ── format_level ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_level_integral_keeps_decimal_point() {
        assert_eq!(format_level(0.0), "0.0");
        assert_eq!(format_level(1.0), "1.0");
        assert_eq!(format_level(-3.0), "-3.0");
    }

    #[test]
    fn test_format_level_fractional() {
        assert_eq!(format_level(1.5), "1.5");
        assert_eq!(format_level(round_to(1.0 / 3.0, 2)), "0.33");
    }

    #[test]
    fn test_format_level_exponent_form() {
        assert_eq!(format_level(1e16), "1e+16");
        assert_eq!(format_level(2.5e16), "2.5e+16");
        assert_eq!(format_level(1e-5), "1e-05");
        assert_eq!(format_level(-1.5e-7), "-1.5e-07");
        assert_eq!(format_level(1e100), "1e+100");
    }

    #[test]
    fn test_format_level_exponent_cutoffs() {
        assert_eq!(format_level(9999999999999998.0), "9999999999999998.0");
        assert_eq!(format_level(0.0001), "0.0001");
    }

    #[test]
    fn test_format_level_non_finite() {
        assert_eq!(format_level(f64::NAN), "nan");
        assert_eq!(format_level(f64::NEG_INFINITY), "-inf");
    }
}
