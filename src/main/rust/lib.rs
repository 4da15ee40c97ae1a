pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::services::{DownloadStream, MetadataResolver, StreamBridgeService};
pub use config::Config;
pub use domain::entities::{StateTransition, StreamSession};
pub use domain::errors::{DomainError, Result};
pub use domain::ports::{
    ByteSource, ExternalProcess, MetricsReporter, ProcessExit, ProcessOutput, ProcessSpawner,
};
pub use domain::value_objects::{
    ContainerFormat, DownloadRequest, EncodingOption, FormatPolicy, MediaDescriptor, SessionState,
    TrackLayout,
};
pub use infrastructure::http::{api_routes, handle_rejection, serve_api, AppState};
pub use infrastructure::metrics::{serve_metrics, PrometheusReporter};
pub use infrastructure::ytdlp::{CommandBuilder, RawInfo, TokioProcessSpawner};
