//! magpie-readers - Reader dispatch and remote content resolution.
//!
//! Converts a local file, a directory, a remote URL, or a video link into
//! a uniform `Vec<Document>` with attached metadata. The dispatch core
//! routes content to pluggable extractors through the
//! [`ExtractorRegistry`]; format parsing itself lives in
//! `magpie-extractors`.
//!
//! # Example
//!
//! ```ignore
//! use magpie_readers::{FileReader, RemoteReader};
//!
//! let docs = FileReader::new().load("notes.md", None).await?;
//!
//! let remote = RemoteReader::new()?;
//! let page = remote.load("https://example.com/article.html").await?;
//! assert_eq!(page[0].metadata["source"], "https://example.com/article.html");
//! ```
//!
//! # Features
//!
//! - `pdf` (default) - bind `.pdf` to the PDF extractor
//! - `docx` (default) - bind `.docx` to the DOCX extractor
//! - `audio` - bind audio extensions and MIME types to the transcriber

mod directory;
mod file;
mod index;
mod registry;
mod remote;
mod youtube;

pub use directory::{DirectoryReader, MetadataFn};
pub use file::FileReader;
pub use index::HttpLoaderIndex;
pub use registry::{default_keys, BindingMap, ExtractorBinding, ExtractorRegistry};
pub use remote::RemoteReader;
pub use youtube::{is_youtube_url, YoutubeTranscriptReader};

pub use magpie_core::{
    DecodePolicy, Document, Extractor, IngestError, IngestResult, LoaderIndex, Metadata,
};

/// User agent sent with every outbound request; some servers reject
/// default or empty agents.
pub(crate) const USER_AGENT: &str = concat!("magpie-readers/", env!("CARGO_PKG_VERSION"));
