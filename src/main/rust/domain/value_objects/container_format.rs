/// Container advertised to the client for a streamed download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerFormat {
    MP4,
    WebM,
    #[default]
    MKV,
    M4A,
    ThreeGP,
    Unknown,
}

impl ContainerFormat {
    /// Parse a file extension such as `mp4` or `.webm` (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp4" => Self::MP4,
            "webm" => Self::WebM,
            "mkv" => Self::MKV,
            "m4a" => Self::M4A,
            "3gp" => Self::ThreeGP,
            _ => Self::Unknown,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::MP4 => "mp4",
            Self::WebM => "webm",
            Self::MKV => "mkv",
            Self::M4A => "m4a",
            Self::ThreeGP => "3gp",
            Self::Unknown => "bin",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::MP4 => "video/mp4",
            Self::WebM => "video/webm",
            Self::MKV => "video/x-matroska",
            Self::M4A => "audio/mp4",
            Self::ThreeGP => "video/3gpp",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Containers the external tool can merge into while writing to a pipe
    pub fn is_mergeable(&self) -> bool {
        matches!(self, Self::MKV | Self::MP4 | Self::WebM)
    }

    pub fn attachment_filename(&self) -> String {
        format!("video.{}", self.extension())
    }
}
