//! Plain-text quote rendering from quoted prices.

use crate::domain::RateLine;

/// One line per rate line: `"{carrier} {origin} -> {destination}: 20GP 118 / 40GP 238"`.
pub fn quote_text(lines: &[RateLine]) -> String {
    lines.iter().map(quote_line).collect::<Vec<_>>().join("\n")
}

pub fn quote_line(line: &RateLine) -> String {
    let prices = line
        .current_prices()
        .iter()
        .map(|(container, price)| format!("{} {}", container, price))
        .collect::<Vec<_>>()
        .join(" / ");
    format!(
        "{} {} -> {}: {}",
        line.carrier_name, line.origin, line.destination, prices
    )
}
