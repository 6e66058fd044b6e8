// * Extraction Orchestrator
// * Single entry point for the admin flow: validate the link, dispatch to the
// * chosen strategy, record the outcome. No cross-strategy retry.

use crate::config::PipelineConfig;
use crate::engine::ai_client::AiExtractionClient;
use crate::engine::normalization::parse_absolute_url;
use crate::engine::strategy::{ExtractionStrategy, HeuristicStrategy, StrategyKind};
use crate::network::client::PageFetcher;
use crate::network::errors::ExtractionError;
use crate::network::resolver::LinkResolver;
use crate::ops::telemetry;
use crate::product::ProductData;
use crate::refinery::scraper::ProductScraper;
use std::time::Instant;
use tracing::{error, info};

pub struct Orchestrator {
    heuristic: Box<dyn ExtractionStrategy>,
    ai: Option<Box<dyn ExtractionStrategy>>,
}

impl Orchestrator {
    /// Wires both strategies from config. The AI strategy is only available
    /// when an endpoint is configured.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ExtractionError> {
        let resolver = LinkResolver::new(config.resolve_timeout(), config.max_redirects)?;
        let heuristic = HeuristicStrategy::new(
            resolver.clone(),
            PageFetcher::new(config.fetch_timeout())?,
            ProductScraper::new(&config.categories),
        );

        let ai: Option<Box<dyn ExtractionStrategy>> = match &config.ai_endpoint {
            Some(endpoint) => {
                let client = AiExtractionClient::new(
                    endpoint.as_str(),
                    config.ai_api_key.clone(),
                    config.ai_timeout(),
                    &config.categories,
                )?
                .with_resolver(resolver);
                Some(Box::new(client))
            }
            None => None,
        };

        Ok(Self::with_strategies(Box::new(heuristic), ai))
    }

    pub fn with_strategies(
        heuristic: Box<dyn ExtractionStrategy>,
        ai: Option<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self { heuristic, ai }
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Extracts `url` with the caller-selected strategy
    pub async fn run(&self, url: &str, strategy: StrategyKind) -> Result<ProductData, ExtractionError> {
        let started = Instant::now();
        let result = self.dispatch(url.trim(), strategy).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(product) => {
                telemetry::record_extraction(strategy.as_str(), "ok", elapsed);
                info!(
                    url,
                    strategy = %strategy,
                    elapsed_ms = (elapsed * 1000.0) as u64,
                    degenerate = product.is_degenerate(),
                    "Extraction finished"
                );
            }
            Err(e) => {
                telemetry::record_extraction(strategy.as_str(), e.kind(), elapsed);
                error!(url, strategy = %strategy, error = %e, kind = e.kind(), "Extraction failed");
            }
        }

        result
    }

    async fn dispatch(&self, url: &str, strategy: StrategyKind) -> Result<ProductData, ExtractionError> {
        // * Nothing to fetch or send for a malformed link
        parse_absolute_url(url)?;

        match strategy {
            StrategyKind::Heuristic => self.heuristic.extract(url).await,
            StrategyKind::Ai => match &self.ai {
                Some(ai) => ai.extract(url).await,
                None => Err(ExtractionError::upstream("AI extraction endpoint is not configured")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::strategy::ExtractionFuture;
    use crate::product::ProductDraft;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedStrategy {
        kind: StrategyKind,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ExtractionStrategy for FixedStrategy {
        fn kind(&self) -> StrategyKind {
            self.kind
        }

        fn extract<'a>(&'a self, url: &'a str) -> ExtractionFuture<'a> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    return Err(ExtractionError::HttpError { status_code: 503 });
                }
                let mut draft = ProductDraft::new(url);
                draft.title = format!("{} result", self.kind);
                Ok(draft.finish())
            })
        }
    }

    fn fixed(kind: StrategyKind, fail: bool) -> (Box<dyn ExtractionStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = FixedStrategy {
            kind,
            calls: calls.clone(),
            fail,
        };
        (Box::new(strategy), calls)
    }

    #[tokio::test]
    async fn test_dispatches_selected_strategy() {
        let (heuristic, h_calls) = fixed(StrategyKind::Heuristic, false);
        let (ai, a_calls) = fixed(StrategyKind::Ai, false);
        let orchestrator = Orchestrator::with_strategies(heuristic, Some(ai));

        let product = orchestrator
            .run("https://example.com/p/1", StrategyKind::Ai)
            .await
            .unwrap();

        assert_eq!(product.title(), "ai result");
        assert_eq!(h_calls.load(Ordering::SeqCst), 0);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_cross_strategy_retry() {
        let (heuristic, h_calls) = fixed(StrategyKind::Heuristic, true);
        let (ai, a_calls) = fixed(StrategyKind::Ai, false);
        let orchestrator = Orchestrator::with_strategies(heuristic, Some(ai));

        let err = orchestrator
            .run("https://example.com/p/1", StrategyKind::Heuristic)
            .await
            .unwrap_err();

        assert_eq!(err, ExtractionError::HttpError { status_code: 503 });
        assert_eq!(h_calls.load(Ordering::SeqCst), 1);
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_for_both_strategies() {
        let (heuristic, h_calls) = fixed(StrategyKind::Heuristic, false);
        let (ai, a_calls) = fixed(StrategyKind::Ai, false);
        let orchestrator = Orchestrator::with_strategies(heuristic, Some(ai));

        for strategy in [StrategyKind::Heuristic, StrategyKind::Ai] {
            let err = orchestrator.run("not a link", strategy).await.unwrap_err();
            assert!(matches!(err, ExtractionError::InvalidUrl(_)));
        }
        assert_eq!(h_calls.load(Ordering::SeqCst), 0);
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ai_unconfigured_is_upstream_error() {
        let (heuristic, _) = fixed(StrategyKind::Heuristic, false);
        let orchestrator = Orchestrator::with_strategies(heuristic, None);

        assert!(!orchestrator.has_ai());
        let err = orchestrator
            .run("https://example.com/p/1", StrategyKind::Ai)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::UpstreamError { .. }));
    }

    #[test]
    fn test_from_default_config() {
        let orchestrator = Orchestrator::from_config(&PipelineConfig::default()).unwrap();
        assert!(!orchestrator.has_ai());
    }

    #[test]
    fn test_orchestrator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Orchestrator>();
    }
}
