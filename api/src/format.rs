//! Money formatting for the Vietnamese storefront.

use rust_decimal::{Decimal, RoundingStrategy};

/// Render an amount in Vietnamese dong: `.` groups thousands, `,` marks
/// the fraction, and `₫` follows after a space.
///
/// The fraction is rounded half away from zero to at most three digits and
/// trailing zeros are dropped, so whole amounts print without one. Every
/// screen uses the `₫` suffix, staff pages included.
///
/// ```
/// use depot_api::format_vnd;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_vnd(Decimal::new(1_250_000, 0)), "1.250.000 ₫");
/// ```
#[must_use]
pub fn format_vnd(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{grouped} ₫")
    } else {
        format!("{sign}{grouped},{fraction} ₫")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_vnd(dec!(0)), "0 ₫");
        assert_eq!(format_vnd(dec!(950)), "950 ₫");
        assert_eq!(format_vnd(dec!(50000)), "50.000 ₫");
        assert_eq!(format_vnd(dec!(1234567)), "1.234.567 ₫");
    }

    #[test]
    fn fractions_use_comma() {
        assert_eq!(format_vnd(dec!(1500.50)), "1.500,5 ₫");
        assert_eq!(format_vnd(dec!(12.345)), "12,345 ₫");
        assert_eq!(format_vnd(dec!(100.00)), "100 ₫");
    }

    #[test]
    fn fraction_keeps_at_most_three_digits() {
        assert_eq!(format_vnd(dec!(1.2345)), "1,235 ₫");
        assert_eq!(format_vnd(dec!(1999.9996)), "2.000 ₫");
        assert_eq!(format_vnd(dec!(-0.0004)), "0 ₫");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_vnd(dec!(-25000)), "-25.000 ₫");
    }
}
