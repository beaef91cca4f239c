//! Content-type registry mapping extensions and MIME types to extractors.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use magpie_core::{Extractor, IngestError, IngestResult, LoaderIndex};
use magpie_extractors::ExtractorFactory;

/// Binding target for a content-type key.
#[derive(Clone)]
pub enum ExtractorBinding {
    /// Textual identifier resolved through the factory, then the index.
    Identifier(String),
    /// Already-constructed extractor, returned as-is.
    Instance(Arc<dyn Extractor>),
}

impl From<&str> for ExtractorBinding {
    fn from(identifier: &str) -> Self {
        Self::Identifier(identifier.to_string())
    }
}

impl From<Arc<dyn Extractor>> for ExtractorBinding {
    fn from(extractor: Arc<dyn Extractor>) -> Self {
        Self::Instance(extractor)
    }
}

/// Mapping from content-type keys to extractor bindings.
pub type BindingMap = HashMap<String, ExtractorBinding>;

/// Default extension and MIME bindings. Every identifier here resolves
/// through the factory without a network call.
static DEFAULT_BINDINGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut bindings = HashMap::new();
    bindings.insert(".txt", "text");
    bindings.insert(".text", "text");
    bindings.insert(".log", "text");
    bindings.insert(".md", "markdown");
    bindings.insert(".markdown", "markdown");
    bindings.insert(".json", "json");
    bindings.insert(".csv", "csv");

    #[cfg(feature = "pdf")]
    bindings.insert(".pdf", "pdf");

    #[cfg(feature = "docx")]
    bindings.insert(".docx", "docx");

    #[cfg(feature = "audio")]
    {
        bindings.insert(".mp3", "audio");
        bindings.insert(".mp4", "audio");
        bindings.insert("audio/mpeg", "audio");
        bindings.insert("audio/mp3", "audio");
        bindings.insert("audio/mp4", "audio");
    }

    bindings
});

/// Content-type keys present in the default binding table.
pub fn default_keys() -> Vec<&'static str> {
    DEFAULT_BINDINGS.keys().copied().collect()
}

/// Derive the registry key for a path: lowercased extension with leading dot.
pub(crate) fn extension_key(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Registry resolving content-type keys to extractors.
///
/// A caller-supplied binding map replaces the default table entirely; the
/// defaults themselves are never mutated. Identifier bindings resolve
/// local-first through [`ExtractorFactory`], then through the installed
/// [`LoaderIndex`] hook, so already-available extractors work offline while
/// unknown identifiers can still be acquired.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    overrides: Option<Arc<BindingMap>>,
    index: Option<Arc<dyn LoaderIndex>>,
}

impl ExtractorRegistry {
    /// Create a registry backed by the default binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default binding table with a caller-supplied map.
    pub fn with_bindings(mut self, bindings: BindingMap) -> Self {
        self.overrides = Some(Arc::new(bindings));
        self
    }

    /// Install a loader index for remote identifier acquisition.
    pub fn with_index(mut self, index: Arc<dyn LoaderIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Resolve a content-type key (".pdf", "audio/mpeg") to an extractor.
    pub async fn resolve(&self, key: &str) -> IngestResult<Arc<dyn Extractor>> {
        if let Some(bindings) = &self.overrides {
            return match bindings.get(key) {
                Some(ExtractorBinding::Instance(extractor)) => Ok(extractor.clone()),
                Some(ExtractorBinding::Identifier(identifier)) => {
                    self.resolve_identifier(identifier).await
                }
                None => Err(IngestError::not_found(key)),
            };
        }

        match DEFAULT_BINDINGS.get(key) {
            Some(identifier) => self.resolve_identifier(identifier).await,
            None => Err(IngestError::not_found(key)),
        }
    }

    /// Local-first identifier resolution with remote index fallback.
    ///
    /// A bound identifier that resolves nowhere is an `Index` error, not
    /// `ExtractorNotFound`: the latter means "no binding" and triggers
    /// raw-text fallbacks in the readers, which must not swallow a broken
    /// binding.
    async fn resolve_identifier(&self, identifier: &str) -> IngestResult<Arc<dyn Extractor>> {
        match ExtractorFactory::for_identifier(identifier) {
            Ok(extractor) => Ok(extractor),
            Err(_) => match &self.index {
                Some(index) => {
                    debug!(identifier, "not constructible locally, querying loader index");
                    index.lookup(identifier).await
                }
                None => Err(IngestError::index(
                    identifier,
                    "not constructible locally and no loader index is installed",
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use magpie_core::{Document, Metadata};

    struct StubExtractor;

    #[async_trait]
    impl Extractor for StubExtractor {
        async fn extract(
            &self,
            _path: &Path,
            _extra_info: Option<&Metadata>,
        ) -> IngestResult<Vec<Document>> {
            Ok(vec![Document::new("stub")])
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubIndex;

    #[async_trait]
    impl LoaderIndex for StubIndex {
        async fn lookup(&self, identifier: &str) -> IngestResult<Arc<dyn Extractor>> {
            if identifier == "community-reader" {
                Ok(Arc::new(StubExtractor))
            } else {
                Err(IngestError::index(identifier, "unknown"))
            }
        }
    }

    #[tokio::test]
    async fn test_every_default_key_resolves_offline() {
        let registry = ExtractorRegistry::new();
        for key in default_keys() {
            assert!(
                registry.resolve(key).await.is_ok(),
                "default key '{}' should resolve without a network call",
                key
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_key_not_found() {
        let registry = ExtractorRegistry::new();
        let result = registry.resolve(".xyz").await;
        assert!(matches!(
            result,
            Err(IngestError::ExtractorNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_caller_bindings_shadow_defaults_entirely() {
        let mut bindings = BindingMap::new();
        bindings.insert(".custom".to_string(), ExtractorBinding::from("text"));
        let registry = ExtractorRegistry::new().with_bindings(bindings);

        assert!(registry.resolve(".custom").await.is_ok());
        // ".txt" is in the defaults but the caller map replaces them wholesale.
        assert!(matches!(
            registry.resolve(".txt").await,
            Err(IngestError::ExtractorNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_instance_binding_returned_as_is() {
        let instance: Arc<dyn Extractor> = Arc::new(StubExtractor);
        let mut bindings = BindingMap::new();
        bindings.insert(".stub".to_string(), ExtractorBinding::from(instance.clone()));
        let registry = ExtractorRegistry::new().with_bindings(bindings);

        let resolved = registry.resolve(".stub").await.unwrap();
        assert!(Arc::ptr_eq(&resolved, &instance));
    }

    #[tokio::test]
    async fn test_index_fallback_for_unknown_identifier() {
        let mut bindings = BindingMap::new();
        bindings.insert(".ext".to_string(), ExtractorBinding::from("community-reader"));

        let without_index = ExtractorRegistry::new().with_bindings(bindings.clone());
        assert!(matches!(
            without_index.resolve(".ext").await,
            Err(IngestError::Index { .. })
        ));

        let with_index = ExtractorRegistry::new()
            .with_bindings(bindings)
            .with_index(Arc::new(StubIndex));
        let resolved = with_index.resolve(".ext").await.unwrap();
        assert_eq!(resolved.name(), "stub");
    }

    #[tokio::test]
    async fn test_index_failure_propagates() {
        let mut bindings = BindingMap::new();
        bindings.insert(".ext".to_string(), ExtractorBinding::from("nowhere"));
        let registry = ExtractorRegistry::new()
            .with_bindings(bindings)
            .with_index(Arc::new(StubIndex));

        assert!(matches!(
            registry.resolve(".ext").await,
            Err(IngestError::Index { .. })
        ));
    }

    #[test]
    fn test_extension_key() {
        assert_eq!(extension_key(Path::new("a/b/report.PDF")), ".pdf");
        assert_eq!(extension_key(Path::new("notes.txt")), ".txt");
        assert_eq!(extension_key(Path::new("no_extension")), "");
    }
}
