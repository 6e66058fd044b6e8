// * Price Text Normalizer
// * Turns storefront price strings ("₹1,299", "$45.50", "1299/-") into amounts.
// * Unparsable input is a weak signal, never an error: it yields 0.

use crate::config::constants::MAX_SANE_PRICE;
use regex::Regex;
use std::sync::LazyLock;

// * First amount in the text: digits with optional thousands commas and a decimal tail
static PATTERN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("Invalid amount regex"));

/// Parses a currency-formatted string into a non-negative amount.
///
/// Currency symbols, codes and whitespace are ignored, a trailing `/-` is
/// tolerated, and thousands separators (western or Indian grouping) are
/// removed. For ranges or strings holding several amounts the first one wins.
/// Returns `0.0` when nothing sensible can be parsed.
pub fn parse_price(text: &str) -> f64 {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix("/-").unwrap_or(trimmed);

    // * "₹ 1 299" and "Rs. 1,299" both collapse to a single digit run
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    let Some(found) = PATTERN_AMOUNT.find(&compact) else {
        return 0.0;
    };

    let digits = found.as_str().trim_end_matches(',').replace(',', "");
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 && value <= MAX_SANE_PRICE => value,
        _ => 0.0,
    }
}
