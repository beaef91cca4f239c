//! Markdown extraction: section splitting plus link and image stripping.

use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use magpie_core::{metadata_with_source, DecodePolicy, Document, Extractor, IngestResult, Metadata};

static IMAGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static HYPERLINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

/// Markdown extractor producing one document per header section.
///
/// Content before the first header becomes its own section. Image embeds
/// are removed and hyperlinks reduced to their link text, both on by
/// default.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownExtractor {
    remove_hyperlinks: bool,
    remove_images: bool,
}

impl MarkdownExtractor {
    /// Create a markdown extractor with default settings.
    pub fn new() -> Self {
        Self {
            remove_hyperlinks: true,
            remove_images: true,
        }
    }

    /// Configure whether hyperlinks are reduced to their text.
    pub fn with_hyperlinks(mut self, remove: bool) -> Self {
        self.remove_hyperlinks = remove;
        self
    }

    /// Configure whether image embeds are removed.
    pub fn with_images(mut self, remove: bool) -> Self {
        self.remove_images = remove;
        self
    }

    /// Split markdown into (header, body) sections.
    fn sections(text: &str) -> Vec<(Option<String>, String)> {
        let mut sections = Vec::new();
        let mut header: Option<String> = None;
        let mut body: Vec<&str> = Vec::new();

        for line in text.lines() {
            if let Some(rest) = line.strip_prefix('#') {
                let title = rest.trim_start_matches('#').trim();
                if header.is_some() || !body.is_empty() {
                    sections.push((header.take(), body.join("\n")));
                    body.clear();
                }
                header = Some(title.to_string());
            } else {
                body.push(line);
            }
        }
        if header.is_some() || !body.is_empty() {
            sections.push((header, body.join("\n")));
        }
        sections
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for MarkdownExtractor {
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let bytes = tokio::fs::read(path).await?;
        let mut text = DecodePolicy::Ignore.decode(&bytes, &path.display().to_string())?;

        if self.remove_images {
            text = IMAGE_PATTERN.replace_all(&text, "").into_owned();
        }
        if self.remove_hyperlinks {
            text = HYPERLINK_PATTERN.replace_all(&text, "$1").into_owned();
        }

        let metadata = metadata_with_source(extra_info, "file_path", path.display().to_string());
        let documents = Self::sections(&text)
            .into_iter()
            .filter(|(header, body)| header.is_some() || !body.trim().is_empty())
            .map(|(header, body)| {
                let text = match header {
                    Some(header) => format!("{}\n{}", header, body),
                    None => body,
                };
                Document {
                    text,
                    metadata: metadata.clone(),
                }
            })
            .collect();
        Ok(documents)
    }

    fn name(&self) -> &str {
        "markdown"
    }
}
