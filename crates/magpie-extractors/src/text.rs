//! Plain-text extraction with a configurable decode policy.

use std::path::Path;

use async_trait::async_trait;

use magpie_core::{metadata_with_source, DecodePolicy, Document, Extractor, IngestResult, Metadata};

/// Raw text extractor.
///
/// Reads the whole file and decodes it as UTF-8 under the configured
/// [`DecodePolicy`]. The default policy drops undecodable bytes, so this
/// extractor never fails on binary noise unless configured strict.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor {
    policy: DecodePolicy,
}

impl TextExtractor {
    /// Create a text extractor with the default (ignore) policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decode policy.
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl Extractor for TextExtractor {
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let bytes = tokio::fs::read(path).await?;
        let text = self.policy.decode(&bytes, &path.display().to_string())?;
        let metadata = metadata_with_source(extra_info, "file_path", path.display().to_string());
        Ok(vec![Document { text, metadata }])
    }

    fn name(&self) -> &str {
        "text"
    }
}
