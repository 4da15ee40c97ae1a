use crate::domain::errors::{DomainError, Result};

/// A validated request to stream one encoding of a source URL
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    source_url: String,
    encoding_id: String,
}

impl DownloadRequest {
    pub fn new(source_url: String, encoding_id: String) -> Result<Self> {
        Self::validate_present(&source_url, "url")?;
        Self::validate_present(&encoding_id, "formatId")?;

        Ok(Self {
            source_url: source_url.trim().to_string(),
            encoding_id: encoding_id.trim().to_string(),
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn encoding_id(&self) -> &str {
        &self.encoding_id
    }

    /// Selector asking for the chosen encoding muxed with the best audio track,
    /// falling back to the encoding alone when it cannot be paired
    pub fn format_selector(&self) -> String {
        format!("{id}+bestaudio/{id}", id = self.encoding_id)
    }

    fn validate_present(value: &str, name: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidInput(format!("{} is required", name)));
        }
        Ok(())
    }
}
