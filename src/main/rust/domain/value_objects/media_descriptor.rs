use serde::{Deserialize, Serialize};

use super::EncodingOption;

/// Metadata for one media asset, built fresh per resolve call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub encodings: Vec<EncodingOption>,
}
