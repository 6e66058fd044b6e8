// * Field extraction rules
// * Each rule knows one markup pattern for one logical field. Rules are
// * collected into ordered cascades and tried until one yields usable text.

use crate::refinery::image::select_best;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, trace};

static SELECTOR_JSON_LD: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("Invalid JSON-LD selector")
});
static SELECTOR_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a, span[itemprop=\"name\"]").expect("Invalid link selector"));

// * Invisible direction marks some storefronts wrap labels in
const INVISIBLE_MARKS: [char; 3] = ['\u{200e}', '\u{200f}', '\u{feff}'];

/// One extraction strategy for one field
pub trait FieldRule: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Raw candidate text, or None when the markup pattern is absent
    fn extract(&self, document: &Html) -> Option<String>;
}

/// Collapses whitespace runs and strips invisible marks
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.trim_matches(|c| INVISIBLE_MARKS.contains(&c)))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`clean_text`] but keeps line structure, dropping blank lines
pub fn clean_multiline(raw: &str) -> String {
    raw.lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

// * Invalid CSS is logged once at construction and the rule never matches
fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(_) => {
            tracing::warn!(css, "Ignoring rule with invalid selector");
            None
        }
    }
}

/// Text content of the first matching element with non-empty text
pub struct TextRule {
    css: &'static str,
    selector: Option<Selector>,
}

impl TextRule {
    pub fn new(css: &'static str) -> Self {
        Self {
            css,
            selector: parse_selector(css),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.selector.is_some()
    }
}

impl FieldRule for TextRule {
    fn name(&self) -> &str {
        self.css
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = self.selector.as_ref()?;
        document
            .select(selector)
            .map(|el| element_text(&el))
            .find(|text| !text.is_empty())
    }
}

/// Attribute value of the first matching element carrying it
pub struct AttrRule {
    css: &'static str,
    attr: &'static str,
    selector: Option<Selector>,
}

impl AttrRule {
    pub fn new(css: &'static str, attr: &'static str) -> Self {
        Self {
            css,
            attr,
            selector: parse_selector(css),
        }
    }

    /// `<meta property|name="..." content="...">`
    pub fn meta(css: &'static str) -> Self {
        Self::new(css, "content")
    }

    pub fn is_valid(&self) -> bool {
        self.selector.is_some()
    }
}

impl FieldRule for AttrRule {
    fn name(&self) -> &str {
        self.css
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = self.selector.as_ref()?;
        document
            .select(selector)
            .filter_map(|el| el.value().attr(self.attr))
            .map(clean_text)
            .find(|value| !value.is_empty())
    }
}

/// Best image URL of the first matching `<img>` (srcset-aware, lazy-load aware)
pub struct ImageRule {
    css: &'static str,
    selector: Option<Selector>,
}

impl ImageRule {
    pub fn new(css: &'static str) -> Self {
        Self {
            css,
            selector: parse_selector(css),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.selector.is_some()
    }
}

impl FieldRule for ImageRule {
    fn name(&self) -> &str {
        self.css
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = self.selector.as_ref()?;
        document.select(selector).find_map(|el| {
            let img = el.value();
            // * Lazy loaders park the real URL in data-* attributes
            let src = img
                .attr("data-old-hires")
                .filter(|s| !s.trim().is_empty())
                .or_else(|| img.attr("data-src"))
                .or_else(|| img.attr("src"))
                .filter(|s| !s.trim().starts_with("data:"));
            let srcset = img.attr("srcset").or_else(|| img.attr("data-srcset"));

            let best = select_best(src, srcset);
            (!best.is_empty()).then_some(best)
        })
    }
}

/// Structured label/value rows, joined as `label: value` lines
pub struct SpecRowsRule {
    name: &'static str,
    row: Option<Selector>,
    label: Option<Selector>,
    value: Option<Selector>,
}

impl SpecRowsRule {
    pub fn new(row: &'static str, label: &'static str, value: &'static str) -> Self {
        Self {
            name: row,
            row: parse_selector(row),
            label: parse_selector(label),
            value: parse_selector(value),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.row.is_some() && self.label.is_some() && self.value.is_some()
    }
}

impl FieldRule for SpecRowsRule {
    fn name(&self) -> &str {
        self.name
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let (row_sel, label_sel, value_sel) =
            (self.row.as_ref()?, self.label.as_ref()?, self.value.as_ref()?);

        let lines: Vec<String> = document
            .select(row_sel)
            .filter_map(|row| {
                let label_el = row.select(label_sel).next()?;
                let value_el = row.select(value_sel).next()?;
                // ? Single-cell rows match both selectors with the same element
                if label_el.id() == value_el.id() {
                    return None;
                }

                let label = element_text(&label_el);
                let label = label.trim_end_matches(|c: char| c == ':' || c.is_whitespace());
                let value = element_text(&value_el);

                (!label.is_empty() && !value.is_empty()).then(|| format!("{label}: {value}"))
            })
            .collect();

        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

/// Breadcrumb trail labels joined by " > ", home links dropped
pub struct BreadcrumbRule {
    css: &'static str,
    selector: Option<Selector>,
}

impl BreadcrumbRule {
    pub const SEPARATOR: &'static str = " > ";

    pub fn new(container_css: &'static str) -> Self {
        Self {
            css: container_css,
            selector: parse_selector(container_css),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.selector.is_some()
    }
}

impl FieldRule for BreadcrumbRule {
    fn name(&self) -> &str {
        self.css
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = self.selector.as_ref()?;
        let container = document.select(selector).next()?;

        let mut labels: Vec<String> = Vec::new();
        for link in container.select(&SELECTOR_LINK) {
            let label = element_text(&link);
            if label.is_empty() || label.eq_ignore_ascii_case("home") {
                continue;
            }
            if labels.last() != Some(&label) {
                labels.push(label);
            }
        }

        (!labels.is_empty()).then(|| labels.join(Self::SEPARATOR))
    }
}

/// Fields readable from a schema.org `Product` JSON-LD block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLdField {
    Name,
    Description,
    Image,
    Price,
    Category,
}

impl JsonLdField {
    fn as_str(&self) -> &'static str {
        match self {
            JsonLdField::Name => "json_ld:name",
            JsonLdField::Description => "json_ld:description",
            JsonLdField::Image => "json_ld:image",
            JsonLdField::Price => "json_ld:offers.price",
            JsonLdField::Category => "json_ld:category",
        }
    }

    fn read(&self, product: &Value) -> Option<String> {
        match self {
            JsonLdField::Name => scalar_text(product.get("name")?),
            JsonLdField::Description => scalar_text(product.get("description")?),
            JsonLdField::Category => scalar_text(product.get("category")?),
            JsonLdField::Image => image_url(product.get("image")?),
            JsonLdField::Price => {
                let offers = product.get("offers")?;
                let offer = match offers {
                    Value::Array(list) => list.first()?,
                    other => other,
                };
                offer
                    .get("price")
                    .or_else(|| offer.get("lowPrice"))
                    .and_then(scalar_text)
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => clean_text(s),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let url = s.trim();
            (!url.is_empty()).then(|| url.to_string())
        }
        Value::Array(list) => list.iter().find_map(image_url),
        Value::Object(map) => map.get("url").or_else(|| map.get("contentUrl")).and_then(image_url),
        _ => None,
    }
}

fn is_product(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("product"),
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str().is_some_and(|t| t.eq_ignore_ascii_case("product"))),
        _ => false,
    }
}

// * Walks top-level arrays and @graph containers collecting Product nodes
fn collect_products<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_products(item, out)),
        Value::Object(map) => {
            if is_product(value) {
                out.push(value);
            }
            if let Some(graph) = map.get("@graph") {
                collect_products(graph, out);
            }
        }
        _ => {}
    }
}

/// Reads one field from the page's JSON-LD `Product` data
pub struct JsonLdRule {
    field: JsonLdField,
}

impl JsonLdRule {
    pub fn new(field: JsonLdField) -> Self {
        Self { field }
    }
}

impl FieldRule for JsonLdRule {
    fn name(&self) -> &str {
        self.field.as_str()
    }

    fn extract(&self, document: &Html) -> Option<String> {
        for script in document.select(&SELECTOR_JSON_LD) {
            let raw = script.text().collect::<String>();
            let Ok(value) = serde_json::from_str::<Value>(raw.trim()) else {
                trace!("Skipping unparsable JSON-LD block");
                continue;
            };

            let mut products = Vec::new();
            collect_products(&value, &mut products);
            if let Some(found) = products.into_iter().find_map(|p| self.field.read(p)) {
                return Some(found);
            }
        }
        None
    }
}

/// Ordered fallback chain for one logical field
pub struct Cascade {
    field: &'static str,
    rules: Vec<Box<dyn FieldRule>>,
}

impl Cascade {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Appends a rule; rules run in the order they were added
    pub fn rule(mut self, rule: impl FieldRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs the rules in order; the first output accepted by `accept` wins
    pub fn resolve<T, F>(&self, document: &Html, accept: F) -> Option<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        for (rank, rule) in self.rules.iter().enumerate() {
            let Some(raw) = rule.extract(document) else {
                continue;
            };

            match accept(&raw) {
                Some(value) => {
                    debug!(field = self.field, rule = rule.name(), rank, "Cascade hit");
                    return Some(value);
                }
                None => {
                    debug!(field = self.field, rule = rule.name(), rank, "Cascade candidate rejected");
                }
            }
        }

        debug!(field = self.field, rules = self.rules.len(), "Cascade exhausted");
        None
    }

    /// First non-empty cleaned text
    pub fn first_text(&self, document: &Html) -> Option<String> {
        self.resolve(document, |raw| {
            let text = clean_text(raw);
            (!text.is_empty()).then_some(text)
        })
    }

    /// First non-empty cleaned text, line breaks preserved
    pub fn first_block(&self, document: &Html) -> Option<String> {
        self.resolve(document, |raw| {
            let text = clean_multiline(raw);
            (!text.is_empty()).then_some(text)
        })
    }
}
