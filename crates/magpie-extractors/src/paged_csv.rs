//! CSV extraction: one document per row, `header: value` lines.

use std::path::Path;

use async_trait::async_trait;

use magpie_core::{
    metadata_with_source, Document, Extractor, IngestError, IngestResult, Metadata,
};

/// Paged CSV extractor.
///
/// Emits one document per data row so each row can be retrieved on its
/// own; the text pairs every cell with its column header.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExtractor;

impl CsvExtractor {
    /// Create a CSV extractor.
    pub fn new() -> Self {
        Self
    }

    /// Parse rows synchronously (called within spawn_blocking).
    fn rows_sync(bytes: Vec<u8>) -> Result<Vec<String>, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes.as_slice());

        let headers = reader
            .headers()
            .map_err(|e| IngestError::extraction(format!("failed to parse CSV headers: {}", e)))?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| IngestError::extraction(format!("failed to parse CSV row: {}", e)))?;
            let lines: Vec<String> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| format!("{}: {}", header, value))
                .collect();
            rows.push(lines.join("\n"));
        }
        Ok(rows)
    }
}

#[async_trait]
impl Extractor for CsvExtractor {
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let bytes = tokio::fs::read(path).await?;
        let rows = tokio::task::spawn_blocking(move || Self::rows_sync(bytes)).await??;

        let metadata = metadata_with_source(extra_info, "file_path", path.display().to_string());
        Ok(rows
            .into_iter()
            .map(|text| Document {
                text,
                metadata: metadata.clone(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "paged-csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_csv_one_document_per_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "name,age\nalice,30\nbob,41\n").unwrap();

        let docs = CsvExtractor::new().extract(&path, None).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "name: alice\nage: 30");
        assert_eq!(docs[1].text, "name: bob\nage: 41");
    }

    #[tokio::test]
    async fn test_csv_quoted_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "city,motto\nBerlin,\"arm, aber sexy\"\n").unwrap();

        let docs = CsvExtractor::new().extract(&path, None).await.unwrap();
        assert_eq!(docs[0].text, "city: Berlin\nmotto: arm, aber sexy");
    }

    #[tokio::test]
    async fn test_csv_header_only_yields_no_documents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "a,b\n").unwrap();

        let docs = CsvExtractor::new().extract(&path, None).await.unwrap();
        assert!(docs.is_empty());
    }
}
