//! magpie-core - Core types and traits for magpie document ingestion.
//!
//! This crate provides the `Document` data model, the error taxonomy, and
//! the capability traits (`Extractor`, `LoaderIndex`) shared by the reader
//! and extractor crates.
//!
//! # Example
//!
//! ```ignore
//! use magpie_core::{Document, Metadata};
//!
//! let doc = Document::new("extracted text").with_metadata("source", "https://example.com");
//! assert_eq!(doc.metadata["source"], "https://example.com");
//! ```

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{IngestError, IngestResult, SUPPORTED_VIDEO_URL_SHAPES};
pub use traits::{Extractor, LoaderIndex};
pub use types::{metadata_with_source, DecodePolicy, Document, Metadata};
