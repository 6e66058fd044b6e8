// * The Engine
// * URL handling plus the two extraction strategies and the orchestrator that picks one.

pub mod ai_client;
pub mod normalization;
pub mod orchestrator;
pub mod strategy;

// * Re-exports for convenient access
pub use ai_client::AiExtractionClient;
pub use normalization::{canonicalize_link, parse_absolute_url, resolve_against, store_from_host};
pub use orchestrator::Orchestrator;
pub use strategy::{ExtractionFuture, ExtractionStrategy, HeuristicStrategy, StrategyKind};
