// * Operations: structured logging and extraction metrics

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_level,
    record_extraction, record_field_miss, record_redirect_followed,
};
