//! Capability traits implemented by pluggable extractors and resolvers.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::IngestResult;
use crate::types::{Document, Metadata};

/// Pluggable component converting a file on disk into documents.
///
/// This is the single contract the dispatch core knows about: readers hand
/// an extractor a path plus optional caller metadata and get back a document
/// sequence. Implementations attach `extra_info` to every produced document.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract documents from the file at `path`.
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>>;

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}

/// Resolves an extractor identifier that is not available locally.
///
/// The registry tries local construction first; this hook is its remote
/// fallback, letting a broader universe of identifiers map onto usable
/// extractors while default operation stays offline.
#[async_trait]
pub trait LoaderIndex: Send + Sync {
    /// Look up `identifier` and return a constructed extractor.
    async fn lookup(&self, identifier: &str) -> IngestResult<Arc<dyn Extractor>>;
}
