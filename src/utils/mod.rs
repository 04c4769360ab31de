//! Utility functions for formatting values
//!
//! Centralized formatting so ratio tables, comparison tables and listings
//! print numbers the same way.

/// Decimal places used when printing ratios
pub const RATIO_DECIMALS: usize = 3;

/// Placeholder for absent values
pub const ABSENT: &str = "-";

/// Format an optional ratio rounded to three decimals; absent values print as `-`.
///
/// # Examples
/// ```
/// use finratios::utils::format_ratio;
///
/// assert_eq!(format_ratio(Some(0.25329)), "0.253");
/// assert_eq!(format_ratio(Some(2.0)), "2.000");
/// assert_eq!(format_ratio(None), "-");
/// ```
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.*}", RATIO_DECIMALS, v),
        None => ABSENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ratio_rounds_to_three_decimals() {
        assert_eq!(format_ratio(Some(-1.23456)), "-1.235");
        assert_eq!(format_ratio(Some(0.0)), "0.000");
    }
}
