/// Resolutions whose video-only tracks are offered for muxing with best audio
pub const HIGH_RES_ALLOWLIST: [&str; 3] = ["1920x1080", "2560x1440", "3840x2160"];

/// Which tracks an encoding record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackLayout {
    Combined,
    VideoOnly,
    AudioOnly,
    /// Both codecs are `"none"` (storyboards, thumbnails)
    NoTracks,
}

impl TrackLayout {
    /// Classify from the tool's codec fields. Only `"none"` marks a missing track;
    /// an absent field means the extractor did not report the codec.
    pub fn from_codecs(vcodec: Option<&str>, acodec: Option<&str>) -> Self {
        match (Self::is_present(vcodec), Self::is_present(acodec)) {
            (true, true) => Self::Combined,
            (true, false) => Self::VideoOnly,
            (false, true) => Self::AudioOnly,
            (false, false) => Self::NoTracks,
        }
    }

    fn is_present(codec: Option<&str>) -> bool {
        match codec.map(str::trim) {
            None => true,
            Some(c) => !c.is_empty() && c != "none",
        }
    }
}

/// Inclusion policy narrowing the tool's format list to client-relevant options
pub struct FormatPolicy;

impl FormatPolicy {
    pub fn includes(layout: TrackLayout, resolution: Option<&str>) -> bool {
        match layout {
            TrackLayout::Combined => true,
            TrackLayout::VideoOnly => resolution
                .map(|r| HIGH_RES_ALLOWLIST.contains(&r))
                .unwrap_or(false),
            TrackLayout::AudioOnly | TrackLayout::NoTracks => false,
        }
    }
}
