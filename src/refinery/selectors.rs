// * Storefront selector tables.
// * Ranked per field: storefront-specific markup revisions first (newest
// * revision first), then structured data and meta tags, then generic markup.
// ! Storefronts rename classes without notice. When a field starts coming back
// ! empty, capture the page, add the new selector ahead of the old one, and add
// ! a fixture test.

use crate::refinery::rules::{
    AttrRule, BreadcrumbRule, Cascade, ImageRule, JsonLdField, JsonLdRule, SpecRowsRule, TextRule,
};

/// One cascade per scraped field
pub struct SelectorSet {
    pub title: Cascade,
    pub price: Cascade,
    pub original_price: Cascade,
    pub image: Cascade,
    pub description: Cascade,
    pub store: Cascade,
    pub category_hint: Cascade,
}

impl SelectorSet {
    /// Rules covering the storefront families seen in pasted deal links
    pub fn storefronts() -> Self {
        Self {
            title: title_rules(),
            price: price_rules(),
            original_price: original_price_rules(),
            image: image_rules(),
            description: description_rules(),
            store: store_rules(),
            category_hint: category_hint_rules(),
        }
    }

    pub fn cascades(&self) -> [&Cascade; 7] {
        [
            &self.title,
            &self.price,
            &self.original_price,
            &self.image,
            &self.description,
            &self.store,
            &self.category_hint,
        ]
    }
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self::storefronts()
    }
}

fn title_rules() -> Cascade {
    Cascade::new("title")
        // * Flipkart (2024 revision, then legacy)
        .rule(TextRule::new("h1._6EBuvT span.VU-ZEz"))
        .rule(TextRule::new("span.VU-ZEz"))
        .rule(TextRule::new("span.B_NuCI"))
        // * Amazon
        .rule(TextRule::new("#productTitle"))
        .rule(TextRule::new("#title span"))
        // * Structured data
        .rule(JsonLdRule::new(JsonLdField::Name))
        .rule(AttrRule::meta(r#"meta[property="og:title"]"#))
        .rule(TextRule::new(r#"[itemprop="name"]"#))
        // * Generic
        .rule(TextRule::new("h1.product-title"))
        .rule(TextRule::new("h1.product_title"))
        .rule(TextRule::new("h1"))
        .rule(TextRule::new("title"))
}

fn price_rules() -> Cascade {
    Cascade::new("price")
        // * Flipkart
        .rule(TextRule::new("div.Nx9bqj.CxhGGd"))
        .rule(TextRule::new("div.Nx9bqj"))
        .rule(TextRule::new("div._30jeq3._16Jk6d"))
        .rule(TextRule::new("div._30jeq3"))
        // * Amazon
        .rule(TextRule::new("#corePriceDisplay_desktop_feature_div .priceToPay .a-offscreen"))
        .rule(TextRule::new("#corePrice_feature_div .a-price:not([data-a-strike]) .a-offscreen"))
        .rule(TextRule::new("#priceblock_dealprice"))
        .rule(TextRule::new("#priceblock_ourprice"))
        .rule(TextRule::new(".a-price:not([data-a-strike]) .a-offscreen"))
        // * Structured data
        .rule(AttrRule::meta(r#"meta[property="product:price:amount"]"#))
        .rule(AttrRule::meta(r#"meta[itemprop="price"]"#))
        .rule(JsonLdRule::new(JsonLdField::Price))
        .rule(TextRule::new(r#"[itemprop="price"]"#))
        // * Generic (WooCommerce style sale markup first)
        .rule(TextRule::new(".price ins .amount"))
        .rule(TextRule::new(".price .amount"))
        .rule(TextRule::new(".sale-price"))
        .rule(TextRule::new(".product-price"))
        .rule(TextRule::new(".price"))
}

fn original_price_rules() -> Cascade {
    Cascade::new("original_price")
        // * Flipkart
        .rule(TextRule::new("div.yRaY8j"))
        .rule(TextRule::new("div._3I9_wc._2p6lqe"))
        .rule(TextRule::new("div._3I9_wc"))
        // * Amazon
        .rule(TextRule::new("#corePriceDisplay_desktop_feature_div .basisPrice .a-offscreen"))
        .rule(TextRule::new(r#".a-price[data-a-strike="true"] .a-offscreen"#))
        .rule(TextRule::new("span.a-price.a-text-price .a-offscreen"))
        .rule(TextRule::new("#listPrice"))
        .rule(TextRule::new("#priceblock_listprice"))
        // * Generic
        .rule(TextRule::new(".price del .amount"))
        .rule(TextRule::new(".original-price"))
        .rule(TextRule::new(".old-price"))
        .rule(TextRule::new(".mrp"))
        .rule(TextRule::new(".price del"))
        .rule(TextRule::new("s.price"))
}

fn image_rules() -> Cascade {
    Cascade::new("image")
        // * Flipkart
        .rule(ImageRule::new("img.DByuf4"))
        .rule(ImageRule::new("img._396cs4"))
        .rule(ImageRule::new("img._2r_T1I"))
        // * Amazon
        .rule(ImageRule::new("#landingImage"))
        .rule(ImageRule::new("#imgBlkFront"))
        .rule(ImageRule::new("#main-image-container img"))
        // * Structured data
        .rule(AttrRule::meta(r#"meta[property="og:image"]"#))
        .rule(AttrRule::meta(r#"meta[name="twitter:image"]"#))
        .rule(JsonLdRule::new(JsonLdField::Image))
        // * Generic
        .rule(ImageRule::new(r#"img[itemprop="image"]"#))
        .rule(ImageRule::new(".woocommerce-product-gallery__image img"))
        .rule(ImageRule::new(".product-image img"))
}

fn description_rules() -> Cascade {
    Cascade::new("description")
        // * Structured attribute rows outrank free-text marketing copy
        .rule(SpecRowsRule::new("div._3k-BhJ tr", "td:first-child", "td:last-child"))
        .rule(SpecRowsRule::new("table._0ZhAN9 tr", "td:first-child", "td:last-child"))
        .rule(SpecRowsRule::new(
            "#productDetails_techSpec_section_1 tr",
            "th",
            "td",
        ))
        .rule(SpecRowsRule::new(
            "#productOverview_feature_div tr",
            "td:first-child",
            "td:last-child",
        ))
        .rule(SpecRowsRule::new(
            "#detailBullets_feature_div li",
            "span.a-text-bold",
            "span.a-text-bold + span",
        ))
        .rule(SpecRowsRule::new(
            "table.woocommerce-product-attributes tr",
            "th",
            "td",
        ))
        .rule(SpecRowsRule::new(
            "table.specifications tr",
            "th, td:first-child",
            "td:last-child",
        ))
        // * Free text
        .rule(TextRule::new("div._4gvKMe"))
        .rule(TextRule::new("div._1mXcCf"))
        .rule(TextRule::new("#feature-bullets ul"))
        .rule(TextRule::new("#productDescription"))
        .rule(TextRule::new(r#"[itemprop="description"]"#))
        .rule(JsonLdRule::new(JsonLdField::Description))
        .rule(AttrRule::meta(r#"meta[property="og:description"]"#))
        .rule(AttrRule::meta(r#"meta[name="description"]"#))
}

fn store_rules() -> Cascade {
    Cascade::new("store")
        .rule(AttrRule::meta(r#"meta[property="og:site_name"]"#))
        .rule(AttrRule::meta(r#"meta[name="application-name"]"#))
        .rule(AttrRule::meta(r#"meta[name="apple-mobile-web-app-title"]"#))
}

fn category_hint_rules() -> Cascade {
    Cascade::new("category_hint")
        .rule(BreadcrumbRule::new("div._7dPnhA"))
        .rule(BreadcrumbRule::new("div._1MR4o5"))
        .rule(BreadcrumbRule::new("#wayfinding-breadcrumbs_feature_div"))
        .rule(BreadcrumbRule::new(r#"[itemtype*="BreadcrumbList"]"#))
        .rule(BreadcrumbRule::new("nav.woocommerce-breadcrumb"))
        .rule(BreadcrumbRule::new(".breadcrumb"))
        .rule(BreadcrumbRule::new(".breadcrumbs"))
        .rule(JsonLdRule::new(JsonLdField::Category))
}
