//! Pure arithmetic behind the ledger's derived values.
//!
//! Nothing here touches the host surface: the ledger calls these to keep
//! `line_total` and the grand total current, and the UI calls
//! [`format_currency`] when it draws them.

pub const CURRENCY_SYMBOL: &str = "$";

/// Parse a user-typed amount. Empty, malformed or non-finite input counts as zero.
pub fn parse_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Total for a pair of raw field values, using the same zero policy as [`parse_amount`].
pub fn line_total_from_input(quantity: &str, unit_price: &str) -> f64 {
    line_total(parse_amount(quantity), parse_amount(unit_price))
}

pub fn grand_total<I>(line_totals: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    line_totals.into_iter().fold(0.0, |sum, total| sum + total)
}

/// Fixed two-decimal display, e.g. `$7.50`.
pub fn format_currency(amount: f64) -> String {
    // keep 0 * -1 from showing up as "$-0.00"
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}
