//! Directory reader: per-file registry dispatch across a directory tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use magpie_core::{DecodePolicy, Document, IngestError, IngestResult, Metadata};

use crate::file::read_raw;
use crate::registry::{extension_key, ExtractorRegistry};

/// Per-file metadata callback.
pub type MetadataFn = Arc<dyn Fn(&Path) -> Metadata + Send + Sync>;

/// Reader applying registry dispatch to every file in a directory.
///
/// Files are visited in sorted order for deterministic output. Files
/// whose extension has no binding fall back to raw text; resolution
/// failures other than a missing binding propagate.
#[derive(Clone, Default)]
pub struct DirectoryReader {
    registry: ExtractorRegistry,
    policy: DecodePolicy,
    recursive: bool,
    required_exts: Option<Vec<String>>,
    file_metadata: Option<MetadataFn>,
}

impl DirectoryReader {
    /// Create a directory reader with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the decode policy for raw-text fallbacks.
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Descend into subdirectories.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Only read files whose extension key is in `exts` (".pdf" form).
    pub fn with_required_exts(mut self, exts: Vec<String>) -> Self {
        self.required_exts = Some(exts);
        self
    }

    /// Attach per-file metadata from a callback.
    pub fn with_file_metadata(
        mut self,
        metadata: impl Fn(&Path) -> Metadata + Send + Sync + 'static,
    ) -> Self {
        self.file_metadata = Some(Arc::new(metadata));
        self
    }

    /// Load documents from every matching file under `dir`.
    pub async fn load(&self, dir: impl AsRef<Path>) -> IngestResult<Vec<Document>> {
        let root = dir.as_ref().to_path_buf();
        let recursive = self.recursive;
        let required = self.required_exts.clone();
        let files =
            tokio::task::spawn_blocking(move || list_files(&root, recursive, required.as_deref()))
                .await??;

        debug!(count = files.len(), "loading directory contents");

        let mut documents = Vec::new();
        for file in files {
            let metadata = self
                .file_metadata
                .as_ref()
                .map(|f| f(&file))
                .unwrap_or_default();

            match self.registry.resolve(&extension_key(&file)).await {
                Ok(extractor) => {
                    documents.extend(extractor.extract(&file, Some(&metadata)).await?);
                }
                Err(IngestError::ExtractorNotFound { .. }) => {
                    documents.extend(read_raw(&file, self.policy, Some(&metadata)).await?);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(documents)
    }
}

/// Collect files under `root`, skipping hidden entries, sorted by path.
fn list_files(
    root: &Path,
    recursive: bool,
    required_exts: Option<&[String]>,
) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false);
            if hidden {
                continue;
            }

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if required_exts
                .map(|exts| exts.iter().any(|ext| *ext == extension_key(&path)))
                .unwrap_or(true)
            {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
