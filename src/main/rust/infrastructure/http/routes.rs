use std::convert::Infallible;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::application::services::{MetadataResolver, StreamBridgeService};
use crate::domain::errors::DomainError;
use crate::infrastructure::metrics::HealthResponse;

/// Largest accepted `/video-info` request body
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Services shared by all request handlers; holds no per-request state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<MetadataResolver>,
    pub bridge: Arc<StreamBridgeService>,
}

#[derive(Debug, Deserialize)]
pub struct VideoInfoRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "formatId")]
    pub format_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn api_routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let video_info = warp::path("video-info")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json::<VideoInfoRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_video_info);

    let download = warp::path("download")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<DownloadQuery>())
        .and(with_state(state))
        .and_then(handle_download);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&HealthResponse::new("healthy")));

    video_info.or(download).or(health)
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn handle_video_info(
    request: VideoInfoRequest,
    state: AppState,
) -> Result<Response, Infallible> {
    let url = request.url.unwrap_or_default();

    match state.resolver.resolve(&url).await {
        Ok(descriptor) => Ok(warp::reply::json(&descriptor).into_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn handle_download(query: DownloadQuery, state: AppState) -> Result<Response, Infallible> {
    let url = query.url.unwrap_or_default();
    let format_id = query.format_id.unwrap_or_default();

    let stream = match state.bridge.open_download_stream(&url, &format_id) {
        Ok(stream) => stream,
        Err(e) => return Ok(error_response(&e)),
    };

    // The selector always asks for best audio, so the tool writes the merge container
    let container = state.bridge.merge_format();

    // Headers are committed with this response; later failures can only cut the body short
    let mut response = Response::new(Body::wrap_stream(stream));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(container.mime_type()));
    if let Ok(value) = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        container.attachment_filename()
    )) {
        headers.insert(CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

pub fn error_response(error: &DomainError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: error.to_string(),
        }),
        status,
    )
    .into_response()
}

/// Turn warp's own rejections (bad JSON, unknown path) into JSON error bodies
pub async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(e) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("invalid request body: {}", e))
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "request body too large".to_string())
    } else if rejection.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected application/json".to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else if rejection.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid query string".to_string())
    } else {
        tracing::warn!("Unhandled rejection: {:?}", rejection);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };

    Ok(warp::reply::with_status(warp::reply::json(&ErrorBody { error: message }), status)
        .into_response())
}
