//! Video transcript reader and shared URL classification.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use magpie_core::{Document, IngestError, IngestResult, Metadata};

use crate::USER_AGENT;

const DEFAULT_TRANSCRIPT_BASE: &str = "https://www.youtube.com";
const DEFAULT_TRANSCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Recognized video URL shapes, first match wins.
static VIDEO_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^https?://(?:www\.)?youtube\.com/watch\?v=([\w-]+)").unwrap(),
        Regex::new(r"^https?://(?:www\.)?youtube\.com/embed/([\w-]+)").unwrap(),
        // youtu.be does not use a www subdomain
        Regex::new(r"^https?://youtu\.be/([\w-]+)").unwrap(),
    ]
});

/// Whether `url` matches any recognized video-hosting URL shape.
///
/// Shared with the remote reader's content-type normalization so the
/// pattern table exists in exactly one place.
pub fn is_youtube_url(url: &str) -> bool {
    VIDEO_URL_PATTERNS.iter().any(|pattern| pattern.is_match(url))
}

/// Extract the video identifier from a link, if any pattern matches.
fn extract_video_id(link: &str) -> Option<String> {
    VIDEO_URL_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(link)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string())
    })
}

/// Caption payload of the timedtext endpoint (json3 format).
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

/// Reader extracting caption tracks for known video links.
#[derive(Clone)]
pub struct YoutubeTranscriptReader {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl YoutubeTranscriptReader {
    /// Create a transcript reader against the public captioning endpoint.
    pub fn new() -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                IngestError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            base_url: DEFAULT_TRANSCRIPT_BASE.to_string(),
            timeout: DEFAULT_TRANSCRIPT_TIMEOUT,
        })
    }

    /// Point the reader at a different captioning endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load one transcript document per link, in input order.
    ///
    /// Any link that matches no recognized URL shape aborts the whole
    /// batch before a single network call is made.
    pub async fn load<L: AsRef<str>, G: AsRef<str>>(
        &self,
        links: &[L],
        languages: &[G],
    ) -> IngestResult<Vec<Document>> {
        // Validate the whole batch up front: an invalid link is caller
        // error and must not yield a partial document sequence.
        let mut video_ids = Vec::with_capacity(links.len());
        for link in links {
            let link = link.as_ref();
            let video_id = extract_video_id(link).ok_or_else(|| IngestError::InvalidVideoUrl {
                link: link.to_string(),
            })?;
            video_ids.push(video_id);
        }

        let mut documents = Vec::with_capacity(video_ids.len());
        for video_id in video_ids {
            let transcript = self.fetch_transcript(&video_id, languages).await?;
            let metadata = Metadata::from([("video_id".to_string(), video_id)]);
            documents.push(Document {
                text: transcript,
                metadata,
            });
        }
        Ok(documents)
    }

    /// Fetch the caption track, first requested language with a track wins.
    async fn fetch_transcript<G: AsRef<str>>(
        &self,
        video_id: &str,
        languages: &[G],
    ) -> IngestResult<String> {
        for language in languages {
            let language = language.as_ref();
            let url = format!(
                "{}/api/timedtext?v={}&lang={}&fmt=json3",
                self.base_url, video_id, language
            );

            let response = self
                .client
                .get(&url)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| {
                    IngestError::transcript(video_id, format!("transcript request failed: {}", e))
                })?;

            // A missing track surfaces as a non-success status or an empty
            // body; either way the next requested language gets its turn.
            if !response.status().is_success() {
                continue;
            }
            let body = response.text().await.map_err(|e| {
                IngestError::transcript(video_id, format!("failed to read transcript body: {}", e))
            })?;
            if body.trim().is_empty() {
                continue;
            }

            let timed: TimedText = serde_json::from_str(&body).map_err(|e| {
                IngestError::transcript(video_id, format!("unexpected transcript payload: {}", e))
            })?;

            let lines: Vec<String> = timed
                .events
                .iter()
                .map(|event| {
                    event
                        .segs
                        .iter()
                        .map(|seg| seg.utf8.as_str())
                        .collect::<String>()
                })
                .filter(|line| !line.trim().is_empty())
                .collect();

            if !lines.is_empty() {
                debug!(video_id, language, "transcript track found");
                return Ok(lines.join("\n"));
            }
        }

        let requested: Vec<&str> = languages.iter().map(|l| l.as_ref()).collect();
        Err(IngestError::transcript(
            video_id,
            format!("no transcript track for languages {:?}", requested),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_all_three_url_shapes() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=abc123"));
        assert!(is_youtube_url("https://youtube.com/embed/abc123"));
        assert!(is_youtube_url("https://youtu.be/abc123"));
    }

    #[test]
    fn test_rejects_lookalike_urls() {
        assert!(!is_youtube_url("https://example.com/watch?v=x"));
        assert!(!is_youtube_url("https://www.youtu.be/abc123"));
        assert!(!is_youtube_url("not a url"));
    }

    #[test]
    fn test_extracts_identifier_from_each_shape() {
        for url in [
            "https://www.youtube.com/watch?v=abc123",
            "https://youtube.com/embed/abc123",
            "https://youtu.be/abc123",
        ] {
            assert_eq!(extract_video_id(url).as_deref(), Some("abc123"), "{}", url);
        }
    }

    #[tokio::test]
    async fn test_invalid_link_aborts_whole_batch() {
        let reader = YoutubeTranscriptReader::new().unwrap();
        // The first link is valid; validation still fails the call before
        // any network request happens.
        let result = reader
            .load(
                &["https://youtu.be/abc123", "https://example.com/watch?v=x"],
                &["en"],
            )
            .await;

        match result {
            Err(IngestError::InvalidVideoUrl { link }) => {
                assert_eq!(link, "https://example.com/watch?v=x");
            }
            other => panic!("expected InvalidVideoUrl, got {:?}", other.map(|d| d.len())),
        }
    }
}
