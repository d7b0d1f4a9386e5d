// 💷 Currency formatting - en-GB pounds sterling
// Compact form (3 significant digits) for metric cards and hover details,
// full form (pence precision) for tooltips

use num_format::{Locale, ToFormattedString};

const SYMBOL: &str = "£";
const SIGNIFICANT_DIGITS: i32 = 3;

fn grouped(units: u64) -> String {
    units.to_formatted_string(&Locale::en_GB)
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        ""
    }
}

/// £ amount rounded to three significant digits, trailing zero decimals dropped
///
/// `compact(285000.0)` is `"£285,000"`, `compact(1225.0)` is `"£1,230"`,
/// `compact(24.5)` is `"£24.5"`.
pub fn compact(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}0", SYMBOL);
    }

    let abs = value.abs();
    let magnitude = abs.log10().floor() as i32;
    let exponent = magnitude - (SIGNIFICANT_DIGITS - 1);

    // Significant digits as an integer, scaled by 10^exponent
    let digits = if exponent >= 0 {
        (abs / 10f64.powi(exponent)).round() as u64
    } else {
        (abs * 10f64.powi(-exponent)).round() as u64
    };

    if exponent >= 0 {
        let whole = digits * 10u64.pow(exponent as u32);
        return format!("{}{}{}", sign(value), SYMBOL, grouped(whole));
    }

    let places = (-exponent) as u32;
    let divisor = 10u64.pow(places);
    let whole = digits / divisor;
    let fraction = format!("{:0width$}", digits % divisor, width = places as usize);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{}{}{}", sign(value), SYMBOL, grouped(whole))
    } else {
        format!("{}{}{}.{}", sign(value), SYMBOL, grouped(whole), fraction)
    }
}

/// £ amount with pence, e.g. `"£70,000.00"`
pub fn full(value: f64) -> String {
    let pence = (value.abs() * 100.0).round() as u64;
    format!(
        "{}{}{}.{:02}",
        sign(value),
        SYMBOL,
        grouped(pence / 100),
        pence % 100
    )
}

/// Value-axis tick in thousands, e.g. `"£285k"` or `"£2.5k"`
pub fn axis_tick(value: f64) -> String {
    format!("{}{}{}k", sign(value), SYMBOL, value.abs() / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_whole_amounts() {
        assert_eq!(compact(1050.0), "£1,050");
        assert_eq!(compact(17500.0), "£17,500");
        assert_eq!(compact(285000.0), "£285,000");
        assert_eq!(compact(70000.0), "£70,000");
    }

    #[test]
    fn test_compact_rounds_to_three_significant_digits() {
        assert_eq!(compact(1225.0), "£1,230");
        assert_eq!(compact(123456.0), "£123,000");
        assert_eq!(compact(36.75), "£36.8");
        assert_eq!(compact(24.5), "£24.5");
        assert_eq!(compact(12.0), "£12");
        assert_eq!(compact(9.996), "£10");
    }

    #[test]
    fn test_compact_zero_and_negative() {
        assert_eq!(compact(0.0), "£0");
        assert_eq!(compact(-1225.0), "-£1,230");
    }

    #[test]
    fn test_full() {
        assert_eq!(full(70000.0), "£70,000.00");
        assert_eq!(full(1225.5), "£1,225.50");
        assert_eq!(full(0.0), "£0.00");
    }

    #[test]
    fn test_axis_tick() {
        assert_eq!(axis_tick(285000.0), "£285k");
        assert_eq!(axis_tick(2500.0), "£2.5k");
        assert_eq!(axis_tick(0.0), "£0k");
    }
}
