use rust_decimal::Decimal;

use crate::constants::DISPLAY_DECIMAL_PRECISION;

/// Renders a quantity without trailing zeros or scientific notation.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Renders a money amount with two decimal places (banker's rounding).
pub fn format_currency(value: Decimal) -> String {
    format!(
        "{:.prec$}",
        value.round_dp(DISPLAY_DECIMAL_PRECISION),
        prec = DISPLAY_DECIMAL_PRECISION as usize
    )
}
