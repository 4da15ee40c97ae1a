use serde::{Deserialize, Serialize};

/// One client-facing encoding of a media asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingOption {
    /// Opaque tool-defined identifier, round-tripped verbatim to the bridge
    pub encoding_id: String,
    pub label: String,
    pub container_ext: String,
    pub resolution_tag: String,
    pub frame_rate: Option<f64>,
    pub size_bytes_exact: Option<u64>,
    pub size_bytes_approx: Option<u64>,
}

impl EncodingOption {
    /// Whether the presentation layer has any size to show for this option
    pub fn has_known_size(&self) -> bool {
        self.size_bytes_exact.is_some() || self.size_bytes_approx.is_some()
    }

    /// Exact size if known, otherwise the approximation
    pub fn best_size_estimate(&self) -> Option<u64> {
        self.size_bytes_exact.or(self.size_bytes_approx)
    }
}
