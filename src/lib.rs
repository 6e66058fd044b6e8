// * Deal-Flow: product data extraction for the deals back-office.
// * A pasted product link goes in; a normalized ProductData record comes out,
// * either through the selector-cascade scraper or the hosted AI extractor.

pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
pub mod product;
pub mod refinery;

pub use config::{ConfigError, PipelineConfig};
pub use engine::{Orchestrator, StrategyKind};
pub use network::ExtractionError;
pub use product::{ProductData, ProductDraft};
pub use refinery::Category;
