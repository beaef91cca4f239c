//! Remote URL reader: fetch, classify, stage, dispatch.

use std::path::Path;
use std::time::Duration;

use tracing::debug;
use url::Url;

use magpie_core::{DecodePolicy, Document, IngestError, IngestResult, Metadata};

use crate::directory::DirectoryReader;
use crate::registry::{BindingMap, ExtractorRegistry};
use crate::youtube::{is_youtube_url, YoutubeTranscriptReader};
use crate::USER_AGENT;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const STAGING_PREFIX: &str = "magpie-remote-";

/// Normalized content category driving remote dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentCategory {
    /// Plain text or HTML, decoded in place.
    Text,
    /// Audio container, staged to disk for transcription.
    Audio,
    /// Known video-hosting link, routed to the transcript reader.
    VideoTranscript,
    /// Anything else: staged and run through the directory loader.
    Generic,
}

/// Classify a fetched resource. URL-pattern recognition takes precedence
/// over the server-declared type: video hosts typically declare an HTML
/// page for what is conceptually a video resource.
fn classify(url: &str, content_type: &str) -> ContentCategory {
    if is_youtube_url(url) {
        return ContentCategory::VideoTranscript;
    }
    match content_type {
        "text/html" | "text/plain" => ContentCategory::Text,
        "audio/mpeg" | "audio/mp3" | "audio/mp4" => ContentCategory::Audio,
        _ => ContentCategory::Generic,
    }
}

/// File suffix taken from the URL's path component, possibly empty.
fn url_suffix(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            Path::new(parsed.path())
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext))
        })
        .unwrap_or_default()
}

/// Collision-resistant filename for staged remote content.
///
/// The URL hash plus a random integer keeps concurrent fetches of the
/// same URL from clobbering each other's staged files.
fn staged_filename(url: &str) -> String {
    let digest = md5::compute(url.as_bytes());
    let random: u32 = rand::random();
    format!("{}{:x}-{}{}", STAGING_PREFIX, digest, random, url_suffix(url))
}

/// Reader for any remote page or file.
///
/// Fetches the URL, normalizes its content type, and routes it to the
/// matching extraction path: in-place text decoding, staged audio
/// transcription, the transcript reader, or staged generic directory
/// extraction. Staged temporary files and directories are released
/// before `load` returns, on the error path included.
#[derive(Clone)]
pub struct RemoteReader {
    client: reqwest::Client,
    registry: ExtractorRegistry,
    transcripts: YoutubeTranscriptReader,
    languages: Vec<String>,
    timeout: Duration,
}

impl RemoteReader {
    /// Create a remote reader with default settings.
    pub fn new() -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                IngestError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            registry: ExtractorRegistry::new(),
            transcripts: YoutubeTranscriptReader::new()?,
            languages: vec!["en".to_string()],
            timeout: DEFAULT_FETCH_TIMEOUT,
        })
    }

    /// Use a custom registry for staged-content dispatch.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the default binding table for staged-content dispatch.
    pub fn with_bindings(mut self, bindings: BindingMap) -> Self {
        self.registry = self.registry.with_bindings(bindings);
        self
    }

    /// Use a custom transcript reader for video links.
    pub fn with_transcript_reader(mut self, transcripts: YoutubeTranscriptReader) -> Self {
        self.transcripts = transcripts;
        self
    }

    /// Preferred transcript languages for video links.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    /// Set the fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load documents from a remote URL.
    pub async fn load(&self, url: &str) -> IngestResult<Vec<Document>> {
        debug!(url, "fetching remote resource");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                let detail = if e.is_timeout() {
                    format!("request timed out after {:?}", self.timeout)
                } else {
                    e.to_string()
                };
                IngestError::fetch(url, detail)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::fetch_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .split(';')
                    .next()
                    .unwrap_or(value)
                    .trim()
                    .to_ascii_lowercase()
            })
            .unwrap_or_default();

        let body = response.bytes().await.map_err(|e| {
            IngestError::fetch(url, format!("failed to read response body: {}", e))
        })?;

        let category = classify(url, &content_type);
        debug!(url, content_type = %content_type, ?category, "dispatching remote content");

        match category {
            ContentCategory::Text => {
                let text = DecodePolicy::Ignore.decode(&body, url)?;
                let metadata = Metadata::from([("source".to_string(), url.to_string())]);
                Ok(vec![Document { text, metadata }])
            }
            ContentCategory::Audio => self.load_audio(url, &content_type, &body).await,
            ContentCategory::VideoTranscript => {
                self.transcripts.load(&[url], &self.languages).await
            }
            ContentCategory::Generic => self.load_generic(url, &body).await,
        }
    }

    /// Stage audio bytes to a scoped temporary file and transcribe them.
    async fn load_audio(
        &self,
        url: &str,
        content_type: &str,
        body: &[u8],
    ) -> IngestResult<Vec<Document>> {
        let staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(&url_suffix(url))
            .tempfile()?;
        std::fs::write(staged.path(), body)?;

        let extractor = self.registry.resolve(content_type).await?;
        let metadata = Metadata::from([("source".to_string(), url.to_string())]);
        debug!(url, extractor = extractor.name(), "transcribing staged audio");
        extractor.extract(staged.path(), Some(&metadata)).await
        // `staged` drops here, releasing the temporary file on every path.
    }

    /// Stage bytes into a scoped temporary directory and run the
    /// directory loader over it.
    async fn load_generic(&self, url: &str, body: &[u8]) -> IngestResult<Vec<Document>> {
        let staging = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir()?;
        let staged_path = staging.path().join(staged_filename(url));
        std::fs::write(&staged_path, body)?;
        debug!(url, staged = %staged_path.display(), "staged remote content");

        let source = url.to_string();
        let loader = DirectoryReader::new()
            .with_registry(self.registry.clone())
            .with_file_metadata(move |_| {
                Metadata::from([("source".to_string(), source.clone())])
            });
        loader.load(staging.path()).await
        // `staging` drops here, deleting the directory and its contents
        // whether the load succeeded or failed.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text_types() {
        assert_eq!(classify("https://example.com/a", "text/html"), ContentCategory::Text);
        assert_eq!(classify("https://example.com/a", "text/plain"), ContentCategory::Text);
    }

    #[test]
    fn test_classify_audio_types() {
        for mime in ["audio/mpeg", "audio/mp3", "audio/mp4"] {
            assert_eq!(classify("https://example.com/a.mp3", mime), ContentCategory::Audio);
        }
    }

    #[test]
    fn test_classify_video_url_beats_declared_type() {
        // Video hosts declare text/html for watch pages.
        assert_eq!(
            classify("https://www.youtube.com/watch?v=abc123", "text/html"),
            ContentCategory::VideoTranscript
        );
    }

    #[test]
    fn test_classify_everything_else_generic() {
        assert_eq!(
            classify("https://example.com/a.bin", "application/octet-stream"),
            ContentCategory::Generic
        );
        assert_eq!(classify("https://example.com/a", ""), ContentCategory::Generic);
    }

    #[test]
    fn test_url_suffix_from_path() {
        assert_eq!(url_suffix("https://example.com/paper.pdf"), ".pdf");
        assert_eq!(url_suffix("https://example.com/paper.pdf?dl=1"), ".pdf");
        assert_eq!(url_suffix("https://example.com/paper"), "");
    }

    #[test]
    fn test_staged_filename_carries_suffix() {
        let name = staged_filename("https://example.com/report.pdf");
        assert!(name.starts_with(STAGING_PREFIX));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_staged_filename_unique_per_call() {
        let url = "https://example.com/report.pdf";
        assert_ne!(staged_filename(url), staged_filename(url));
    }
}
