use serde::Deserialize;
use serde_json::Number;

use crate::domain::value_objects::{
    EncodingOption, FormatPolicy, MediaDescriptor, TrackLayout,
};

/// Top-level info document printed by `--dump-single-json`
#[derive(Debug, Clone, Deserialize)]
pub struct RawInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<RawFormat>>,
}

/// One entry of the tool's native format list
#[derive(Debug, Clone, Deserialize)]
pub struct RawFormat {
    pub format_id: String,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub filesize: Option<Number>,
    #[serde(default)]
    pub filesize_approx: Option<Number>,
}

impl RawInfo {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Apply the inclusion policy and project survivors, keeping tool order
    pub fn into_descriptor(self) -> MediaDescriptor {
        let encodings = self
            .formats
            .unwrap_or_default()
            .into_iter()
            .filter(|f| FormatPolicy::includes(f.layout(), f.resolution.as_deref()))
            .map(RawFormat::into_encoding_option)
            .collect();

        MediaDescriptor {
            id: self.id,
            title: self.title.unwrap_or_default(),
            thumbnail_url: self.thumbnail.unwrap_or_default(),
            encodings,
        }
    }
}

impl RawFormat {
    pub fn layout(&self) -> TrackLayout {
        TrackLayout::from_codecs(self.vcodec.as_deref(), self.acodec.as_deref())
    }

    pub fn into_encoding_option(self) -> EncodingOption {
        EncodingOption {
            label: self.format_note.or(self.format).unwrap_or_default(),
            container_ext: self.ext.unwrap_or_default(),
            resolution_tag: self.resolution.unwrap_or_default(),
            frame_rate: self.fps,
            size_bytes_exact: size_in_bytes(self.filesize.as_ref()),
            size_bytes_approx: size_in_bytes(self.filesize_approx.as_ref()),
            encoding_id: self.format_id,
        }
    }
}

// Some extractors report sizes as floats
fn size_in_bytes(value: Option<&Number>) -> Option<u64> {
    let value = value?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64)
    })
}
