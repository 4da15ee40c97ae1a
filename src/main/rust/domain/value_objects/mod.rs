mod container_format;
mod download_request;
mod encoding_option;
mod format_policy;
mod media_descriptor;
mod session_state;

pub use container_format::ContainerFormat;
pub use download_request::DownloadRequest;
pub use encoding_option::EncodingOption;
pub use format_policy::{FormatPolicy, TrackLayout, HIGH_RES_ALLOWLIST};
pub use media_descriptor::MediaDescriptor;
pub use session_state::SessionState;
