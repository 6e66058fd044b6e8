// * Canonical deal record produced by every extraction strategy.

use crate::refinery::discount::compute_discount;
use serde::Serialize;

/// Mutable working copy filled in field by field during extraction.
///
/// Prices are sanitized and the discount is derived when the draft is
/// finished, so a [`ProductData`] can never carry an inconsistent discount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub original_price: f64,
    pub image: String,
    pub store: String,
    pub link: String,
    pub category: String,
}

impl ProductDraft {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Default::default()
        }
    }

    /// Freezes the draft into an immutable record
    pub fn finish(self) -> ProductData {
        let price = sanitize_amount(self.price);
        let original_price = sanitize_amount(self.original_price);

        ProductData {
            discount_percentage: compute_discount(price, original_price),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            original_price,
            image: self.image.trim().to_string(),
            store: self.store.trim().to_string(),
            link: self.link.trim().to_string(),
            category: self.category.trim().to_string(),
        }
    }
}

// * 0 means "unknown"; negative or non-finite values collapse to it
fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Normalized product record handed to the deal-creation flow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    title: String,
    description: String,
    price: f64,
    original_price: f64,
    discount_percentage: u8,
    image: String,
    store: String,
    link: String,
    category: String,
}

impl ProductData {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn original_price(&self) -> f64 {
        self.original_price
    }

    pub fn discount_percentage(&self) -> u8 {
        self.discount_percentage
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// True when the page was reachable but nothing beyond the link was extracted
    pub fn is_degenerate(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.price == 0.0
            && self.original_price == 0.0
            && self.image.is_empty()
            && self.store.is_empty()
            && self.category.is_empty()
    }

    /// Converts the record to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Converts the record to a pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
