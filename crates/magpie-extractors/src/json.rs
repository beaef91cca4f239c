//! JSON extraction: depth-first flattening into `path: value` lines.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use magpie_core::{metadata_with_source, DecodePolicy, Document, Extractor, IngestResult, Metadata};

/// JSON extractor producing one document of `path: value` lines.
///
/// Nested objects contribute dotted paths, arrays indexed paths, so the
/// resulting text stays searchable without the punctuation noise of the
/// raw serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl JsonExtractor {
    /// Create a JSON extractor.
    pub fn new() -> Self {
        Self
    }

    fn flatten(value: &Value, path: &str, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    Self::flatten(child, &child_path, lines);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    let child_path = if path.is_empty() {
                        i.to_string()
                    } else {
                        format!("{}.{}", path, i)
                    };
                    Self::flatten(child, &child_path, lines);
                }
            }
            Value::String(s) => lines.push(format!("{}: {}", path, s)),
            other => lines.push(format!("{}: {}", path, other)),
        }
    }
}

#[async_trait]
impl Extractor for JsonExtractor {
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let bytes = tokio::fs::read(path).await?;
        let text = DecodePolicy::Ignore.decode(&bytes, &path.display().to_string())?;
        let value: Value = serde_json::from_str(&text)?;

        let mut lines = Vec::new();
        Self::flatten(&value, "", &mut lines);

        let metadata = metadata_with_source(extra_info, "file_path", path.display().to_string());
        Ok(vec![Document {
            text: lines.join("\n"),
            metadata,
        }])
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_json_flattens_nested_objects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"a": {"b": 1}, "c": "two"}"#).unwrap();

        let docs = JsonExtractor::new().extract(&path, None).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.contains("a.b: 1"));
        assert!(docs[0].text.contains("c: two"));
    }

    #[tokio::test]
    async fn test_json_flattens_arrays_with_indices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"items": ["x", "y"]}"#).unwrap();

        let docs = JsonExtractor::new().extract(&path, None).await.unwrap();
        assert!(docs[0].text.contains("items.0: x"));
        assert!(docs[0].text.contains("items.1: y"));
    }

    #[tokio::test]
    async fn test_json_invalid_input_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = JsonExtractor::new().extract(&path, None).await;
        assert!(matches!(result, Err(magpie_core::IngestError::Json(_))));
    }
}
