//! API 서버용 HTTP middleware.

mod cors;
mod metrics;

pub use cors::cors_layer;
pub use metrics::metrics_layer;
