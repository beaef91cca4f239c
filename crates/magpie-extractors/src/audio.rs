//! Audio transcription via an OpenAI-compatible API.

use std::path::Path;

use async_openai::{
    config::OpenAIConfig,
    types::{AudioInput, CreateTranscriptionRequestArgs},
    Client,
};
use async_trait::async_trait;

use magpie_core::{
    metadata_with_source, Document, Extractor, IngestError, IngestResult, Metadata,
};

/// Configuration for audio transcription.
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    /// Transcription model (default: whisper-1).
    pub model: String,
    /// ISO-639-1 language hint (optional).
    pub language: Option<String>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: None,
        }
    }
}

/// Audio transcriber backed by an OpenAI-compatible transcription API.
///
/// Requires credentials in the environment (or a custom client via
/// `with_client`); this is why the `audio` feature is opt-in.
pub struct AudioTranscriber {
    client: Client<OpenAIConfig>,
    config: TranscriberConfig,
}

impl AudioTranscriber {
    /// Create a transcriber with the default client and configuration.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            config: TranscriberConfig::default(),
        }
    }

    /// Create a transcriber with custom configuration.
    pub fn with_config(config: TranscriberConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a transcriber with a custom client (API key, base URL).
    pub fn with_client(client: Client<OpenAIConfig>, config: TranscriberConfig) -> Self {
        Self { client, config }
    }
}

impl Default for AudioTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for AudioTranscriber {
    async fn extract(
        &self,
        path: &Path,
        extra_info: Option<&Metadata>,
    ) -> IngestResult<Vec<Document>> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let mut request = CreateTranscriptionRequestArgs::default();
        request
            .file(AudioInput::from_vec_u8(filename, bytes))
            .model(&self.config.model);
        if let Some(language) = &self.config.language {
            request.language(language);
        }
        let request = request
            .build()
            .map_err(|e| IngestError::extraction(format!("invalid transcription request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| IngestError::extraction(format!("transcription API error: {}", e)))?;

        if response.text.trim().is_empty() {
            return Err(IngestError::extraction(format!(
                "empty transcript for {}",
                path.display()
            )));
        }

        let metadata = metadata_with_source(extra_info, "file_path", path.display().to_string());
        Ok(vec![Document {
            text: response.text,
            metadata,
        }])
    }

    fn name(&self) -> &str {
        "audio-transcriber"
    }
}
