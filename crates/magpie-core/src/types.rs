//! Core types for document ingestion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{IngestError, IngestResult};

/// Metadata attached to a document: a flat string-to-string mapping.
pub type Metadata = HashMap<String, String>;

/// Unit of extracted text plus metadata.
///
/// Immutable once returned from a reader; ownership transfers to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text content.
    pub text: String,

    /// Metadata describing the document's origin and context.
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check whether the document carries any meaningful text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Get content length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }
}

/// Build document metadata from caller-supplied extra info, inserting the
/// source identifier under `key` only when the caller did not set it.
pub fn metadata_with_source(
    extra_info: Option<&Metadata>,
    key: &str,
    value: impl Into<String>,
) -> Metadata {
    let mut metadata = extra_info.cloned().unwrap_or_default();
    metadata
        .entry(key.to_string())
        .or_insert_with(|| value.into());
    metadata
}

/// How undecodable bytes are handled when reading raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Drop invalid byte sequences silently.
    #[default]
    Ignore,
    /// Substitute invalid byte sequences with U+FFFD.
    Replace,
    /// Fail on the first invalid byte sequence.
    Strict,
}

impl DecodePolicy {
    /// Decode `bytes` as UTF-8, tolerating a leading byte-order mark.
    ///
    /// `source` identifies the content in error messages (a path or URL).
    pub fn decode(self, bytes: &[u8], source: &str) -> IngestResult<String> {
        let bytes = bytes.strip_prefix(b"\xef\xbb\xbf".as_slice()).unwrap_or(bytes);
        match self {
            DecodePolicy::Ignore => Ok(drop_invalid(bytes)),
            DecodePolicy::Replace => Ok(String::from_utf8_lossy(bytes).into_owned()),
            DecodePolicy::Strict => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(text.to_owned()),
                Err(err) => Err(IngestError::Decode {
                    source_id: source.to_string(),
                    message: err.to_string(),
                }),
            },
        }
    }
}

/// Decode UTF-8 dropping invalid sequences, byte-for-byte with what the
/// "ignore" error policy of a lenient text reader produces.
fn drop_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&rest[..valid_up_to]));
                let skip = err.error_len().unwrap_or(rest.len() - valid_up_to);
                rest = &rest[valid_up_to + skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("hello").with_metadata("source", "test://a");
        assert_eq!(doc.text, "hello");
        assert_eq!(doc.metadata.get("source"), Some(&"test://a".to_string()));
        assert_eq!(doc.len(), 5);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_document_empty() {
        let doc = Document::new("   \n");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_metadata_with_source_inserts_when_absent() {
        let metadata = metadata_with_source(None, "file_path", "/tmp/a.txt");
        assert_eq!(metadata.get("file_path"), Some(&"/tmp/a.txt".to_string()));
    }

    #[test]
    fn test_metadata_with_source_keeps_caller_value() {
        let mut extra = Metadata::new();
        extra.insert("file_path".to_string(), "caller-set".to_string());
        extra.insert("topic".to_string(), "birds".to_string());

        let metadata = metadata_with_source(Some(&extra), "file_path", "/tmp/a.txt");
        assert_eq!(metadata.get("file_path"), Some(&"caller-set".to_string()));
        assert_eq!(metadata.get("topic"), Some(&"birds".to_string()));
    }

    #[test]
    fn test_decode_ignore_drops_invalid() {
        let bytes = b"ab\xffcd";
        let text = DecodePolicy::Ignore.decode(bytes, "test").unwrap();
        assert_eq!(text, "abcd");
    }

    #[test]
    fn test_decode_replace_substitutes() {
        let bytes = b"ab\xffcd";
        let text = DecodePolicy::Replace.decode(bytes, "test").unwrap();
        assert_eq!(text, "ab\u{fffd}cd");
    }

    #[test]
    fn test_decode_strict_fails() {
        let bytes = b"ab\xffcd";
        let result = DecodePolicy::Strict.decode(bytes, "bad.txt");
        assert!(matches!(result, Err(IngestError::Decode { .. })));
        assert!(result.unwrap_err().to_string().contains("bad.txt"));
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xef\xbb\xbfhello";
        let text = DecodePolicy::Strict.decode(bytes, "test").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_decode_valid_utf8_all_policies() {
        for policy in [DecodePolicy::Ignore, DecodePolicy::Replace, DecodePolicy::Strict] {
            let text = policy.decode("héllo".as_bytes(), "test").unwrap();
            assert_eq!(text, "héllo");
        }
    }
}
