//! Factory resolving extractor identifiers to instances.

use std::sync::Arc;

use magpie_core::{DecodePolicy, Extractor, IngestError, IngestResult};

use crate::{CsvExtractor, JsonExtractor, MarkdownExtractor, TextExtractor};

#[cfg(feature = "pdf")]
use crate::PdfExtractor;

#[cfg(feature = "docx")]
use crate::DocxExtractor;

#[cfg(feature = "audio")]
use crate::{AudioTranscriber, TranscriberConfig};

/// Factory for creating content extractors.
///
/// `for_identifier` is the local (offline) tier of registry resolution:
/// it never touches the network, and every identifier in the default
/// binding table resolves here.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a raw text extractor.
    pub fn text() -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::new())
    }

    /// Create a raw text extractor with a custom decode policy.
    pub fn text_with_policy(policy: DecodePolicy) -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::new().with_policy(policy))
    }

    /// Create a markdown extractor.
    pub fn markdown() -> Arc<dyn Extractor> {
        Arc::new(MarkdownExtractor::new())
    }

    /// Create a JSON extractor.
    pub fn json() -> Arc<dyn Extractor> {
        Arc::new(JsonExtractor::new())
    }

    /// Create a paged CSV extractor.
    pub fn csv() -> Arc<dyn Extractor> {
        Arc::new(CsvExtractor::new())
    }

    /// Create a PDF extractor.
    #[cfg(feature = "pdf")]
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create a DOCX extractor.
    #[cfg(feature = "docx")]
    pub fn docx() -> Arc<dyn Extractor> {
        Arc::new(DocxExtractor::new())
    }

    /// Create an audio transcriber with default configuration.
    #[cfg(feature = "audio")]
    pub fn audio() -> Arc<dyn Extractor> {
        Arc::new(AudioTranscriber::new())
    }

    /// Create an audio transcriber with custom configuration.
    #[cfg(feature = "audio")]
    pub fn audio_with_config(config: TranscriberConfig) -> Arc<dyn Extractor> {
        Arc::new(AudioTranscriber::with_config(config))
    }

    /// Resolve an identifier to an extractor, locally and offline.
    pub fn for_identifier(identifier: &str) -> IngestResult<Arc<dyn Extractor>> {
        match identifier {
            "text" => Ok(Self::text()),
            "markdown" => Ok(Self::markdown()),
            "json" => Ok(Self::json()),
            "csv" => Ok(Self::csv()),

            #[cfg(feature = "pdf")]
            "pdf" => Ok(Self::pdf()),

            #[cfg(feature = "docx")]
            "docx" => Ok(Self::docx()),

            #[cfg(feature = "audio")]
            "audio" => Ok(Self::audio()),

            _ => Err(IngestError::ExtractorNotFound {
                key: identifier.to_string(),
            }),
        }
    }

    /// Identifiers constructible in this build.
    pub fn identifiers() -> Vec<&'static str> {
        let mut identifiers = vec!["text", "markdown", "json", "csv"];

        #[cfg(feature = "pdf")]
        identifiers.push("pdf");

        #[cfg(feature = "docx")]
        identifiers.push("docx");

        #[cfg(feature = "audio")]
        identifiers.push("audio");

        identifiers
    }
}
