//! magpie-extractors - Pluggable content extractors for document ingestion.
//!
//! Each extractor implements the [`Extractor`] contract from `magpie-core`:
//! a file path plus optional caller metadata in, a document sequence out.
//! The [`ExtractorFactory`] resolves textual identifiers to extractor
//! instances and is the local tier of the registry's two-tier resolution.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text extraction via pdf-extract
//! - `docx` (default) - DOCX text extraction via docx-rs
//! - `audio` - audio transcription via an OpenAI-compatible API
//! - `full` - all extraction features
//!
//! # Example
//!
//! ```ignore
//! use magpie_extractors::ExtractorFactory;
//!
//! let extractor = ExtractorFactory::for_identifier("markdown")?;
//! let documents = extractor.extract(Path::new("notes.md"), None).await?;
//! ```

mod factory;
mod json;
mod markdown;
mod paged_csv;
mod text;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

#[cfg(feature = "audio")]
mod audio;

pub use factory::ExtractorFactory;
pub use json::JsonExtractor;
pub use markdown::MarkdownExtractor;
pub use paged_csv::CsvExtractor;
pub use text::TextExtractor;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "docx")]
pub use docx::DocxExtractor;

#[cfg(feature = "audio")]
pub use audio::{AudioTranscriber, TranscriberConfig};

pub use magpie_core::Extractor;
