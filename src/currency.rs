//! Fixed-locale (pt-BR / BRL) currency formatting.
//!
//! `mask` implements the live input mask: raw digit entry is read as an
//! integer count of centavos and reformatted on every change, so typing
//! "1500" yields "R$ 15,00". `parse` is its exact inverse and also accepts
//! the grouped strings `format` produces for totals.

/// Reformat raw input as a masked BRL string.
///
/// Everything that is not an ASCII digit is stripped first; the remaining
/// digits fill the price from the centavo position outward. Empty input
/// masks to "R$ 0,00".
pub fn mask(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let cents = digits.parse::<i64>().unwrap_or(0);
    format_cents(cents)
}

/// Format a value in currency units (not centavos) as BRL, rounded to the cent.
pub fn format(value: f64) -> String {
    format_cents((value * 100.0).round() as i64)
}

/// Parse a BRL string back to a value in currency units.
///
/// Keeps digits and the decimal comma, swaps the comma for a dot, then
/// parses. Inverts `mask`/`format` for any value they produce; returns
/// `None` when no digits remain.
pub fn parse(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    cleaned.replacen(',', ".", 1).parse::<f64>().ok()
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    // Group the whole part in threes with '.' separators.
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}R$ {},{:02}", sign, grouped, frac)
}
