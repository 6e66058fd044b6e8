// * The Refinery (Extraction Pipeline)
// * Goal: Turn raw storefront HTML into a normalized product record.
// * Leaves (price, discount, image, category) are pure functions; the scraper
// * composes them through ranked selector cascades.

pub mod category;
pub mod discount;
pub mod image;
pub mod price;
pub mod rules;
pub mod scraper;
pub mod selectors;

// * Re-exports for convenient access
pub use category::{Category, CategoryInferencer};
pub use discount::compute_discount;
pub use image::{select_best, upgrade_resolution};
pub use price::parse_price;
pub use rules::{
    AttrRule, BreadcrumbRule, Cascade, FieldRule, ImageRule, JsonLdField, JsonLdRule, SpecRowsRule,
    TextRule,
};
pub use scraper::ProductScraper;
pub use selectors::SelectorSet;
