//! Result formatting shared by the evaluator, the function dispatcher and
//! the conversion/statistics surfaces.
//!
//! The canonical policy, first match wins:
//!
//! | Magnitude | Output |
//! |-----------|--------|
//! | `< 1e-10` | `"0"` |
//! | `> 1e15` | exponential, 10 mantissa fraction digits (`1.2345678900e+16`) |
//! | otherwise | rounded to 15 significant digits, shortest decimal form |

/// Values below this magnitude are floating-point noise and display as zero
pub const ZERO_THRESHOLD: f64 = 1e-10;

/// Values above this magnitude switch to exponential notation
pub const EXPONENTIAL_THRESHOLD: f64 = 1e15;

/// Significant digits kept in plain decimal output
pub const SIGNIFICANT_DIGITS: usize = 15;

/// Fraction digits of the mantissa in exponential output
pub const EXPONENT_FRACTION_DIGITS: usize = 10;

/// Format a raw finite result for display.
///
/// Non-finite input is rendered by `f64`'s own `Display`; callers reject
/// those values before formatting.
pub fn format_result(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    if magnitude < ZERO_THRESHOLD {
        "0".to_string()
    } else if magnitude > EXPONENTIAL_THRESHOLD {
        to_exponential(value, EXPONENT_FRACTION_DIGITS)
    } else {
        round_significant(value, SIGNIFICANT_DIGITS).to_string()
    }
}

/// Round to `digits` significant digits
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if digits == 0 || value == 0.0 || !value.is_finite() {
        return value;
    }
    format!("{:.*e}", digits - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Exponential notation with an explicitly signed exponent: `1.5000000000e+16`
pub fn to_exponential(value: f64, fraction_digits: usize) -> String {
    let raw = format!("{:.*e}", fraction_digits, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        },
        _ => raw,
    }
}

/// Shortest decimal form of a value, used in expression labels (`√(4)`)
pub fn display_number(value: f64) -> String {
    if value == 0.0 {
        // Collapse negative zero
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Fixed-decimal output used by conversion and statistics surfaces
pub fn fixed(value: f64, decimals: usize) -> String {
    let out = format!("{:.*}", decimals, value);
    // "-0.00" reads as a sign error
    if out.starts_with('-') && out[1..].chars().all(|c| c == '0' || c == '.') {
        out[1..].to_string()
    } else {
        out
    }
}
