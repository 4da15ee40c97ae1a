mod download_stream;
mod metadata_resolver;
mod stream_bridge;

pub use download_stream::{DownloadStream, CHUNK_SIZE};
pub use metadata_resolver::MetadataResolver;
pub use stream_bridge::StreamBridgeService;
