//! Error types for ingestion operations.

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// URL shapes accepted by the video transcript reader.
pub const SUPPORTED_VIDEO_URL_SHAPES: &str = "https://www.youtube.com/watch?v=<id> (with or without 'www.'), \
     https://youtube.com/embed/<id> (with or without 'www.'), \
     https://youtu.be/<id>";

/// Main error type for all ingestion operations.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Network or HTTP failure while fetching a remote resource.
    #[error("fetch failed for {url}: {message}")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// No extractor is bound to a content-type key.
    #[error("no extractor bound for content-type key '{key}'")]
    ExtractorNotFound { key: String },

    /// A video link does not match any supported URL shape. Aborts the
    /// whole batch: this is a caller error, not a transient condition.
    #[error("'{link}' is not a supported video URL; supported shapes: {SUPPORTED_VIDEO_URL_SHAPES}")]
    InvalidVideoUrl { link: String },

    /// The captioning service has no usable transcript track.
    #[error("transcript unavailable for video '{video_id}': {message}")]
    Transcript { video_id: String, message: String },

    /// Loader index lookup failed for an extractor identifier.
    #[error("loader index lookup failed for '{identifier}': {message}")]
    Index { identifier: String, message: String },

    /// Content could not be decoded under the strict policy.
    #[error("failed to decode {source_id} as UTF-8: {message}")]
    Decode { source_id: String, message: String },

    /// An extraction delegate failed.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Reader construction or configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error (file open/read, staging writes).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Task join error from spawn_blocking.
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IngestError {
    /// Create a fetch error without an HTTP status.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a fetch error from a non-success HTTP status.
    pub fn fetch_status(url: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            url: url.into(),
            status: Some(status),
            message: format!("server returned HTTP {}", status),
        }
    }

    /// Create an extractor-not-found error for a content-type key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::ExtractorNotFound { key: key.into() }
    }

    /// Create an extraction-delegate error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create a transcript error.
    pub fn transcript(video_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transcript {
            video_id: video_id.into(),
            message: message.into(),
        }
    }

    /// Create a loader index error.
    pub fn index(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Index {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}
