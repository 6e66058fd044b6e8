// * Extraction strategies
// * Heuristic scraping and hosted AI extraction share one capability so the
// * orchestrator never special-cases either.

use crate::engine::normalization::canonicalize_link;
use crate::network::client::PageFetcher;
use crate::network::errors::ExtractionError;
use crate::network::resolver::LinkResolver;
use crate::product::ProductData;
use crate::refinery::scraper::ProductScraper;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use tracing::info;

/// Boxed future returned by strategies
pub type ExtractionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ProductData, ExtractionError>> + Send + 'a>>;

/// Which extraction path the caller picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Heuristic,
    Ai,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Heuristic => "heuristic",
            StrategyKind::Ai => "ai",
        }
    }

    /// The strategy an admin should try after this one fails
    pub fn alternate(&self) -> Self {
        match self {
            StrategyKind::Heuristic => StrategyKind::Ai,
            StrategyKind::Ai => StrategyKind::Heuristic,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(StrategyKind::Heuristic),
            "ai" => Ok(StrategyKind::Ai),
            other => Err(format!("unknown strategy '{other}' (expected heuristic or ai)")),
        }
    }
}

/// One way of turning a product URL into a [`ProductData`]
pub trait ExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn extract<'a>(&'a self, url: &'a str) -> ExtractionFuture<'a>;
}

/// Link Resolver (best-effort) -> HTML Fetcher (fatal) -> Selector-Cascade Scraper
pub struct HeuristicStrategy {
    resolver: LinkResolver,
    fetcher: PageFetcher,
    scraper: ProductScraper,
}

impl HeuristicStrategy {
    pub fn new(resolver: LinkResolver, fetcher: PageFetcher, scraper: ProductScraper) -> Self {
        Self {
            resolver,
            fetcher,
            scraper,
        }
    }

    async fn run(&self, url: &str) -> Result<ProductData, ExtractionError> {
        let resolved = self.resolver.resolve_or_original(url).await;
        let page = self.fetcher.fetch(&resolved).await?;

        // * The fetch may have followed redirects the HEAD walk could not
        let link = canonicalize_link(&page.final_url);
        info!(url, resolved = %resolved, link = %link, bytes = page.body.len(), "Page fetched, scraping");

        Ok(self.scraper.scrape(&page.body, &link))
    }
}

impl ExtractionStrategy for HeuristicStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Heuristic
    }

    fn extract<'a>(&'a self, url: &'a str) -> ExtractionFuture<'a> {
        Box::pin(self.run(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!("heuristic".parse::<StrategyKind>(), Ok(StrategyKind::Heuristic));
        assert_eq!(" AI ".parse::<StrategyKind>(), Ok(StrategyKind::Ai));
        assert!("magic".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_strategy_kind_alternate() {
        assert_eq!(StrategyKind::Heuristic.alternate(), StrategyKind::Ai);
        assert_eq!(StrategyKind::Ai.alternate().to_string(), "heuristic");
    }

    #[test]
    fn test_strategy_kind_serde() {
        assert_eq!(serde_json::to_string(&StrategyKind::Ai).unwrap(), "\"ai\"");
        let kind: StrategyKind = serde_json::from_str("\"heuristic\"").unwrap();
        assert_eq!(kind, StrategyKind::Heuristic);
    }
}
