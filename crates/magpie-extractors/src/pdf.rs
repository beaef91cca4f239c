//! PDF content extraction using pdf-extract.

use std::path::Path;

use async_trait::async_trait;

use magpie_core::{
    metadata_with_source, Document, Extractor, IngestError, IngestResult, Metadata,
};

/// PDF text extractor.
///
/// Wraps the synchronous pdf-extract call in spawn_blocking to avoid
/// blocking the async runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let bytes = tokio::fs::read(path).await?;
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| IngestError::extraction(format!("failed to parse PDF: {}", e)))
        })
        .await??;

        if text.trim().is_empty() {
            return Err(IngestError::extraction(format!(
                "no text extracted from {}",
                path.display()
            )));
        }

        let metadata = metadata_with_source(extra_info, "file_path", path.display().to_string());
        Ok(vec![Document { text, metadata }])
    }

    fn name(&self) -> &str {
        "pdf"
    }
}
