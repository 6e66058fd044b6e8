// * Discount Calculator
// * Discounts are always derived from the price pair, never scraped.

/// Rounded percentage drop from `original_price` to `price`.
///
/// Returns 0 unless `original_price > price > 0`, which rules out missing
/// original prices, equal prices and inverted data entry.
pub fn compute_discount(price: f64, original_price: f64) -> u8 {
    // * Written so NaN falls through to 0
    if !(price > 0.0 && original_price > price) {
        return 0;
    }

    let percent = ((original_price - price) / original_price * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
