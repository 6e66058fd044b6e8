// * Network layer: short link expansion and page retrieval.

pub mod client;
pub mod errors;
pub mod identity;
pub mod resolver;

pub use client::{FetchedPage, PageFetcher};
pub use errors::ExtractionError;
pub use identity::BrowserIdentity;
pub use resolver::LinkResolver;
