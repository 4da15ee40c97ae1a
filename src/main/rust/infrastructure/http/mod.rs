mod routes;
mod server;

pub use routes::{
    api_routes, error_response, handle_rejection, AppState, DownloadQuery, ErrorBody,
    VideoInfoRequest,
};
pub use server::serve_api;
