//! DOCX content extraction using docx-rs.

use std::path::Path;

use async_trait::async_trait;
use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableChild, TableRowChild};

use magpie_core::{
    metadata_with_source, Document, Extractor, IngestError, IngestResult, Metadata,
};

/// DOCX text extractor.
///
/// Walks paragraphs and tables; tables are flattened into `|`-separated
/// rows. The synchronous docx-rs parse runs under spawn_blocking.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a DOCX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract text synchronously (called within spawn_blocking).
    fn extract_sync(bytes: Vec<u8>) -> Result<String, IngestError> {
        let docx = docx_rs::read_docx(&bytes)
            .map_err(|e| IngestError::extraction(format!("failed to parse DOCX: {}", e)))?;

        let mut parts: Vec<String> = Vec::new();
        for child in docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => {
                    let text = Self::paragraph_text(&p);
                    if !text.trim().is_empty() {
                        parts.push(text);
                    }
                }
                DocumentChild::Table(t) => {
                    let text = Self::table_text(&t);
                    if !text.trim().is_empty() {
                        parts.push(text);
                    }
                }
                _ => {}
            }
        }
        Ok(parts.join("\n"))
    }

    fn paragraph_text(p: &docx_rs::Paragraph) -> String {
        let mut text = String::new();
        for child in &p.children {
            if let ParagraphChild::Run(r) = child {
                for run_child in &r.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
        }
        text
    }

    fn table_text(t: &docx_rs::Table) -> String {
        let mut rows: Vec<String> = Vec::new();
        for row in &t.rows {
            let TableChild::TableRow(r) = row;
            let mut cells: Vec<String> = Vec::new();
            for cell in &r.cells {
                let TableRowChild::TableCell(c) = cell;
                let mut cell_text = String::new();
                for child in &c.children {
                    if let docx_rs::TableCellContent::Paragraph(p) = child {
                        let para = Self::paragraph_text(p);
                        if !cell_text.is_empty() && !para.is_empty() {
                            cell_text.push(' ');
                        }
                        cell_text.push_str(&para);
                    }
                }
                cells.push(cell_text.trim().to_string());
            }
            rows.push(cells.join(" | "));
        }
        rows.join("\n")
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let bytes = tokio::fs::read(path).await?;
        let text = tokio::task::spawn_blocking(move || Self::extract_sync(bytes)).await??;

        if text.trim().is_empty() {
            return Err(IngestError::extraction(format!(
                "no text extracted from {}",
                path.display()
            )));
        }

        let metadata = metadata_with_source(extra_info, "file_path", path.display().to_string());
        Ok(vec![Document { text, metadata }])
    }

    fn name(&self) -> &str {
        "docx"
    }
}
