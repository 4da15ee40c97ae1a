use std::future::Future;
use std::net::SocketAddr;

use warp::Filter;

use super::PrometheusReporter;

/// Health check response structure
#[derive(serde::Serialize)]
pub(crate) struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub(crate) fn new(status: &'static str) -> Self {
        Self {
            status,
            service: "media-bridge",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

pub fn metrics_routes() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    let metrics_route = warp::path("metrics").and(warp::path::end()).map(|| {
        let body = PrometheusReporter::gather_metrics();
        warp::reply::with_header(body, "content-type", "text/plain; version=0.0.4; charset=utf-8")
    });

    let health_route = warp::path("health")
        .and(warp::path::end())
        .map(|| warp::reply::json(&HealthResponse::new("healthy")));

    // Liveness probe endpoint (minimal check - is the process running?)
    let liveness_route = warp::path("livez")
        .and(warp::path::end())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Readiness probe endpoint (can the service accept traffic?)
    let readiness_route = warp::path("readyz")
        .and(warp::path::end())
        .map(|| warp::reply::json(&HealthResponse::new("ready")));

    metrics_route
        .or(health_route)
        .or(liveness_route)
        .or(readiness_route)
}

pub async fn serve_metrics(
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), warp::Error> {
    // CORS configuration for browser access
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["Content-Type"]);

    let (bound, server) =
        warp::serve(metrics_routes().with(cors)).try_bind_with_graceful_shutdown(addr, shutdown)?;

    tracing::info!("Metrics server listening on http://{}", bound);
    server.await;
    Ok(())
}
