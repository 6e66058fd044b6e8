// * Configuration Constants
// * Central location for all fixed thresholds and timeouts

// * HTML page fetch timeout in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 10;

// * Timeout for each HEAD hop while expanding short links
pub const RESOLVE_TIMEOUT_SECS: u64 = 10;

// * Maximum redirects followed by the link resolver
pub const MAX_REDIRECTS: usize = 5;

// * Hosted AI extraction call timeout in seconds
pub const AI_TIMEOUT_SECS: u64 = 60;

// * Target edge length (px) when upgrading low-resolution image URLs
pub const IMAGE_TARGET_SIZE: u32 = 832;

// * Prices above this are treated as parse noise (concatenated digit runs)
pub const MAX_SANE_PRICE: f64 = 10_000_000.0;

// * Maximum characters kept for a scraped description
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

// * Environment variable names read by PipelineConfig::from_env
pub const ENV_AI_ENDPOINT: &str = "DEAL_FLOW_AI_ENDPOINT";
pub const ENV_AI_API_KEY: &str = "DEAL_FLOW_AI_API_KEY";
pub const ENV_FETCH_TIMEOUT: &str = "DEAL_FLOW_FETCH_TIMEOUT_SECS";
pub const ENV_CATEGORIES_FILE: &str = "DEAL_FLOW_CATEGORIES_FILE";
