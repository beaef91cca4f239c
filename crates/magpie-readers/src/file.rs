//! Single-file reader: explicit delegation, registry dispatch, raw fallback.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use magpie_core::{
    metadata_with_source, DecodePolicy, Document, Extractor, IngestError, IngestResult, Metadata,
};

use crate::registry::{extension_key, ExtractorRegistry};

/// Reader for a single local file.
///
/// Resolution order: an explicit reader when configured, then the
/// registry by extension key, then a raw-text fallback under the
/// configured decode policy. Open and read failures always propagate.
#[derive(Clone, Default)]
pub struct FileReader {
    registry: ExtractorRegistry,
    policy: DecodePolicy,
    reader: Option<Arc<dyn Extractor>>,
}

impl FileReader {
    /// Create a file reader with the default registry and decode policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the decode policy for the raw-text fallback.
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bypass resolution and delegate every load to this reader.
    pub fn with_reader(mut self, reader: Arc<dyn Extractor>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Load documents from the file at `path`.
    pub async fn load(
        &self,
        path: impl AsRef<Path>,
        metadata: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let path = path.as_ref();

        if let Some(reader) = &self.reader {
            debug!(path = %path.display(), reader = reader.name(), "delegating to explicit reader");
            return reader.extract(path, metadata).await;
        }

        match self.registry.resolve(&extension_key(path)).await {
            Ok(extractor) => {
                debug!(path = %path.display(), extractor = extractor.name(), "dispatching by extension");
                extractor.extract(path, metadata).await
            }
            Err(IngestError::ExtractorNotFound { .. }) => {
                debug!(path = %path.display(), "no extractor bound, reading as raw text");
                read_raw(path, self.policy, metadata).await
            }
            Err(err) => Err(err),
        }
    }
}

/// Raw-text fallback shared by the file and directory readers.
pub(crate) async fn read_raw(
    path: &Path,
    policy: DecodePolicy,
    metadata: Option<&Metadata>,
) -> IngestResult<Vec<Document>> {
    let bytes = tokio::fs::read(path).await?;
    let text = policy.decode(&bytes, &path.display().to_string())?;
    let metadata = metadata_with_source(metadata, "file_path", path.display().to_string());
    Ok(vec![Document { text, metadata }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::tempdir;

    struct FixedExtractor;

    #[async_trait]
    impl Extractor for FixedExtractor {
        async fn extract(
            &self,
            path: &Path,
            extra_info: Option<&Metadata>,
        ) -> IngestResult<Vec<Document>> {
            let metadata =
                metadata_with_source(extra_info, "file_path", path.display().to_string());
            Ok(vec![Document {
                text: "fixed".to_string(),
                metadata,
            }])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_raw_fallback_for_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.zzz");
        std::fs::write(&path, b"raw \xff contents").unwrap();

        let docs = FileReader::new().load(&path, None).await.unwrap();
        assert_eq!(docs.len(), 1);
        // Default "ignore" policy drops the invalid byte silently.
        assert_eq!(docs[0].text, "raw  contents");
    }

    #[tokio::test]
    async fn test_caller_metadata_passed_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.zzz");
        std::fs::write(&path, "x").unwrap();

        let mut extra = Metadata::new();
        extra.insert("origin".to_string(), "unit-test".to_string());

        let docs = FileReader::new().load(&path, Some(&extra)).await.unwrap();
        assert_eq!(docs[0].metadata.get("origin"), Some(&"unit-test".to_string()));
        assert_eq!(
            docs[0].metadata.get("file_path"),
            Some(&path.display().to_string())
        );
    }

    #[tokio::test]
    async fn test_explicit_reader_takes_precedence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "registry would handle this").unwrap();

        let reader = FileReader::new().with_reader(Arc::new(FixedExtractor));
        let docs = reader.load(&path, None).await.unwrap();
        assert_eq!(docs[0].text, "fixed");
    }

    #[tokio::test]
    async fn test_registered_extension_dispatches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "# Title\nbody").unwrap();

        let docs = FileReader::new().load(&path, None).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "Title\nbody");
    }

    #[tokio::test]
    async fn test_missing_file_propagates_io_error() {
        let result = FileReader::new()
            .load("/nonexistent/never.zzz", None)
            .await;
        assert!(matches!(result, Err(IngestError::Io(_))));
    }

    #[tokio::test]
    async fn test_strict_policy_surfaces_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.zzz");
        std::fs::write(&path, b"ok\xff").unwrap();

        let reader = FileReader::new().with_policy(DecodePolicy::Strict);
        assert!(matches!(
            reader.load(&path, None).await,
            Err(IngestError::Decode { .. })
        ));
    }
}
