// * Selector-Cascade Scraper
// * Populates a ProductData from raw HTML. Every field runs its own cascade;
// * a miss on one field never blocks the others.

use crate::config::constants::DESCRIPTION_MAX_CHARS;
use crate::engine::normalization::{resolve_against, store_from_host};
use crate::ops::telemetry;
use crate::product::{ProductData, ProductDraft};
use crate::refinery::category::{Category, CategoryInferencer};
use crate::refinery::image::upgrade_resolution;
use crate::refinery::price::parse_price;
use crate::refinery::rules::{clean_text, BreadcrumbRule, Cascade};
use crate::refinery::selectors::SelectorSet;
use scraper::Html;
use tracing::debug;

pub struct ProductScraper {
    selectors: SelectorSet,
    inferencer: CategoryInferencer,
}

impl ProductScraper {
    /// Scraper with the built-in storefront rules
    pub fn new(categories: &[Category]) -> Self {
        Self::with_selectors(SelectorSet::storefronts(), categories)
    }

    /// Scraper with a custom rule set
    pub fn with_selectors(selectors: SelectorSet, categories: &[Category]) -> Self {
        Self {
            selectors,
            inferencer: CategoryInferencer::new(categories),
        }
    }

    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// Extracts a product record from `html` served at `page_url`.
    ///
    /// `page_url` becomes the record's link and the base for relative image URLs.
    /// Unparsable markup produces a degenerate record, never an error.
    pub fn scrape(&self, html: &str, page_url: &str) -> ProductData {
        let document = Html::parse_document(html);
        let mut draft = ProductDraft::new(page_url);

        draft.title = self.selectors.title.first_text(&document).unwrap_or_default();
        draft.price = positive_price(&self.selectors.price, &document);
        draft.original_price = positive_price(&self.selectors.original_price, &document);

        // * Placeholders that fail resolution fall through to the next rule
        draft.image = self
            .selectors
            .image
            .resolve(&document, |raw| {
                resolve_against(raw, page_url).map(|url| upgrade_resolution(&url))
            })
            .unwrap_or_default();

        draft.description = self
            .selectors
            .description
            .first_block(&document)
            .map(|text| truncate_chars(&text, DESCRIPTION_MAX_CHARS))
            .unwrap_or_default();

        draft.store = self
            .selectors
            .store
            .first_text(&document)
            .unwrap_or_else(|| store_from_host(page_url));

        let trail = self.selectors.category_hint.first_text(&document).unwrap_or_default();
        let hint = category_hint(&trail, &draft.title);
        draft.category = self.inferencer.infer(&hint, &draft.title, &draft.description);

        record_misses(&draft);
        debug!(
            url = page_url,
            title = %draft.title,
            price = draft.price,
            original_price = draft.original_price,
            category = %draft.category,
            "Scraped product"
        );

        draft.finish()
    }
}

// * Zero or unparsable candidates fall through to the next rule
fn positive_price(cascade: &Cascade, document: &Html) -> f64 {
    cascade
        .resolve(document, |raw| {
            let value = parse_price(raw);
            (value > 0.0).then_some(value)
        })
        .unwrap_or(0.0)
}

// * Deepest breadcrumb that isn't the product itself (some trails end with the title)
fn category_hint(trail: &str, title: &str) -> String {
    let title = title.to_lowercase();
    trail
        .split(BreadcrumbRule::SEPARATOR)
        .map(clean_text)
        .filter(|label| !label.is_empty())
        .filter(|label| {
            let label = label.to_lowercase();
            title.is_empty() || !(title == label || title.starts_with(label.trim_end_matches("...")))
        })
        .last()
        .unwrap_or_default()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

fn record_misses(draft: &ProductDraft) {
    let misses = [
        ("title", draft.title.is_empty()),
        ("price", draft.price == 0.0),
        ("original_price", draft.original_price == 0.0),
        ("image", draft.image.is_empty()),
        ("description", draft.description.is_empty()),
        ("category", draft.category.is_empty()),
    ];
    for (field, missed) in misses {
        if missed {
            telemetry::record_field_miss(field);
        }
    }
}
