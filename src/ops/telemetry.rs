// * Telemetry - Structured Logging and Prometheus Metrics
// * Logs go to stderr so stdout stays clean for the extracted record.

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec, Encoder,
    HistogramVec, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Extraction calls by strategy and outcome (ok / error kind)
    pub static ref EXTRACTIONS_TOTAL: CounterVec = register_counter_vec!(
        "deal_flow_extractions_total",
        "Total extraction calls by strategy and outcome",
        &["strategy", "outcome"]
    ).unwrap();

    // * End-to-end extraction duration
    pub static ref EXTRACTION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "deal_flow_extraction_duration_seconds",
        "Extraction duration in seconds",
        &["strategy"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    ).unwrap();

    // * Fields left at their zero value after the cascade ran dry
    pub static ref FIELD_MISSES_TOTAL: CounterVec = register_counter_vec!(
        "deal_flow_field_misses_total",
        "Scraped fields that no rule could populate",
        &["field"]
    ).unwrap();

    // * Redirect hops followed while expanding short links
    pub static ref REDIRECTS_FOLLOWED_TOTAL: Counter = register_counter!(
        "deal_flow_redirects_followed_total",
        "Redirect hops followed by the link resolver"
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use deal_flow::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://example.com", "Extracting product");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes tracing with a custom default level (RUST_LOG still wins)
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .try_init();
}

/// Returns the current metrics in the Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Records a finished extraction call
pub fn record_extraction(strategy: &str, outcome: &str, seconds: f64) {
    EXTRACTIONS_TOTAL.with_label_values(&[strategy, outcome]).inc();
    EXTRACTION_DURATION_SECONDS
        .with_label_values(&[strategy])
        .observe(seconds);
}

/// Records a scraped field that stayed empty
pub fn record_field_miss(field: &str) {
    FIELD_MISSES_TOTAL.with_label_values(&[field]).inc();
}

/// Records one followed redirect hop
pub fn record_redirect_followed() {
    REDIRECTS_FOLLOWED_TOTAL.inc();
}
