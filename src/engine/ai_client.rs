// * AI Extraction Client
// * Adapter for the hosted extraction service. The service does the fetching and
// * reading; we only map its answer onto the canonical record.

use crate::config::constants::AI_TIMEOUT_SECS;
use crate::engine::normalization::{canonicalize_link, parse_absolute_url, store_from_host};
use crate::engine::strategy::{ExtractionFuture, ExtractionStrategy, StrategyKind};
use crate::network::errors::ExtractionError;
use crate::network::resolver::LinkResolver;
use crate::product::{ProductData, ProductDraft};
use crate::refinery::category::{Category, CategoryInferencer};
use crate::refinery::image::select_best;
use crate::refinery::price::parse_price;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    product: Option<AiProduct>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AiProduct {
    title: Option<String>,
    description: Option<String>,
    price: Option<AmountField>,
    original_price: Option<AmountField>,
    // ! Accepted for compatibility and ignored, the discount is always derived
    #[allow(dead_code)]
    discount_percentage: Option<serde_json::Value>,
    image: Option<String>,
    store: Option<String>,
    category: Option<String>,
}

/// Prices show up as `14999`, `14999.0` or `"₹14,999"` depending on the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum AmountField {
    Number(f64),
    Text(String),
}

impl AmountField {
    fn amount(&self) -> f64 {
        match self {
            AmountField::Number(n) => *n,
            AmountField::Text(s) => parse_price(s),
        }
    }
}

pub struct AiExtractionClient {
    inner: Client,
    endpoint: String,
    api_key: Option<String>,
    inferencer: CategoryInferencer,
    resolver: Option<LinkResolver>,
}

impl AiExtractionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        categories: &[Category],
    ) -> Result<Self, ExtractionError> {
        let endpoint = endpoint.into();
        parse_absolute_url(&endpoint)?;

        let inner = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::NetworkError(format!("client setup failed: {e}")))?;

        Ok(Self {
            inner,
            endpoint,
            api_key,
            inferencer: CategoryInferencer::new(categories),
            resolver: None,
        })
    }

    /// Expands pasted short links for the record's `link` (HEAD walk only, no fetch)
    pub fn with_resolver(mut self, resolver: LinkResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_default_timeout(
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ExtractionError> {
        Self::new(endpoint, api_key, Duration::from_secs(AI_TIMEOUT_SECS), &[])
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `url` to the extraction service and normalizes the reply.
    ///
    /// Transport failures keep their classification (`Timeout`, `NetworkError`);
    /// anything wrong with the service's answer is an `UpstreamError`.
    pub async fn extract(&self, url: &str) -> Result<ProductData, ExtractionError> {
        let mut request = self.inner.post(&self.endpoint).json(&ExtractRequest { url });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ExtractionError::from_reqwest(&e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ExtractionError::from_reqwest(&e))?;

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Extraction service rejected request");
            return Err(ExtractionError::upstream(format!(
                "extraction service returned HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: ExtractResponse = serde_json::from_str(&body)
            .map_err(|e| ExtractionError::upstream(format!("malformed response: {e}")))?;

        if let Some(error) = parsed.error.filter(|e| !e.trim().is_empty()) {
            return Err(ExtractionError::upstream(error));
        }
        if parsed.success == Some(false) {
            return Err(ExtractionError::upstream("extraction service reported failure"));
        }
        let product = parsed
            .product
            .ok_or_else(|| ExtractionError::upstream("response carried no product"))?;

        // * The service is sent the link as pasted; the record carries the destination
        let destination = match &self.resolver {
            Some(resolver) => resolver.resolve_or_original(url).await,
            None => url.to_string(),
        };

        let record = self.normalize(&destination, product);
        info!(url, title = %record.title(), price = record.price(), "AI extraction complete");
        Ok(record)
    }

    fn normalize(&self, url: &str, product: AiProduct) -> ProductData {
        let link = canonicalize_link(url);
        let mut draft = ProductDraft::new(link.clone());

        draft.title = product.title.unwrap_or_default();
        draft.description = product.description.unwrap_or_default();
        draft.price = product.price.as_ref().map(AmountField::amount).unwrap_or(0.0);
        draft.original_price = product
            .original_price
            .as_ref()
            .map(AmountField::amount)
            .unwrap_or(0.0);

        // * Same upgrade path as scraped images
        draft.image = product
            .image
            .filter(|img| !img.trim().is_empty())
            .map(|img| select_best(Some(img.trim()), None))
            .unwrap_or_default();

        draft.store = product
            .store
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| store_from_host(&link));

        let provided = product.category.unwrap_or_default();
        draft.category = if self.inferencer.is_empty() {
            provided
        } else {
            let inferred = self
                .inferencer
                .infer(&provided, &draft.title, &draft.description);
            if inferred.is_empty() {
                provided
            } else {
                inferred
            }
        };

        debug!(url, category = %draft.category, "Mapped AI product");
        draft.finish()
    }
}

impl ExtractionStrategy for AiExtractionClient {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ai
    }

    fn extract<'a>(&'a self, url: &'a str) -> ExtractionFuture<'a> {
        Box::pin(AiExtractionClient::extract(self, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(categories: &[Category]) -> AiExtractionClient {
        AiExtractionClient::new(
            "https://ai.example.com/extract",
            None,
            Duration::from_secs(5),
            categories,
        )
        .unwrap()
    }

    fn product(json: &str) -> AiProduct {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_amount_field_accepts_numbers_and_strings() {
        let p = product(r#"{"price": 14999, "originalPrice": "₹19,999"}"#);
        assert_eq!(p.price.unwrap().amount(), 14999.0);
        assert_eq!(p.original_price.unwrap().amount(), 19999.0);
    }

    #[test]
    fn test_discount_is_recomputed() {
        let p = product(r#"{"title":"Phone","price":750,"originalPrice":1000,"discountPercentage":90}"#);
        let record = client(&[]).normalize("https://www.flipkart.com/p/1", p);
        assert_eq!(record.discount_percentage(), 25);
    }

    #[test]
    fn test_missing_fields_default() {
        let record = client(&[]).normalize("https://www.amazon.in/dp/B01?utm_source=x", AiProduct::default());
        assert_eq!(record.title(), "");
        assert_eq!(record.price(), 0.0);
        assert_eq!(record.image(), "");
        assert_eq!(record.link(), "https://www.amazon.in/dp/B01");
        assert_eq!(record.store(), "Amazon");
    }

    #[test]
    fn test_category_mapped_to_known_id() {
        let categories = vec![Category::new("c-mobiles", "Mobiles")];
        let p = product(r#"{"title":"Galaxy M34","category":"Mobiles & Accessories"}"#);
        let record = client(&categories).normalize("https://www.flipkart.com/p/1", p);
        assert_eq!(record.category(), "c-mobiles");
    }

    #[test]
    fn test_unknown_category_kept_verbatim() {
        let categories = vec![Category::new("c-laptops", "Laptops")];
        let p = product(r#"{"title":"Rice","category":"Groceries"}"#);
        let record = client(&categories).normalize("https://shop.example.com/x", p);
        assert_eq!(record.category(), "Groceries");
    }

    #[test]
    fn test_image_upgraded() {
        let p = product(r#"{"image":"https://rukminim2.flixcart.com/image/128/128/x/m.jpeg"}"#);
        let record = client(&[]).normalize("https://www.flipkart.com/p/1", p);
        assert_eq!(record.image(), "https://rukminim2.flixcart.com/image/832/832/x/m.jpeg");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = AiExtractionClient::with_default_timeout("not a url", None);
        assert!(matches!(result, Err(ExtractionError::InvalidUrl(_))));
    }
}
