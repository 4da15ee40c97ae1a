use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;

use warp::Filter;

use super::routes::{api_routes, handle_rejection, AppState};

/// Serve the API (and the static UI directory, when given) until `shutdown` resolves
pub async fn serve_api(
    addr: SocketAddr,
    state: AppState,
    static_dir: Option<PathBuf>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), warp::Error> {
    // CORS configuration for browser access
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["Content-Type"]);

    let api = api_routes(state);

    match static_dir {
        Some(dir) => {
            tracing::info!("Serving static files from {}", dir.display());
            let routes = api
                .or(warp::get().and(warp::fs::dir(dir)))
                .recover(handle_rejection)
                .with(cors)
                .with(warp::trace::request());
            let (bound, server) =
                warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
            tracing::info!("API server listening on http://{}", bound);
            server.await;
        }
        None => {
            let routes = api
                .recover(handle_rejection)
                .with(cors)
                .with(warp::trace::request());
            let (bound, server) =
                warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
            tracing::info!("API server listening on http://{}", bound);
            server.await;
        }
    }

    Ok(())
}
