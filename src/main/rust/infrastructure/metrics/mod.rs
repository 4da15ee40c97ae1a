mod metrics_server;
mod prometheus_reporter;

pub(crate) use metrics_server::HealthResponse;
pub use metrics_server::{metrics_routes, serve_metrics};
pub use prometheus_reporter::PrometheusReporter;
