//! HTTP-backed loader index for extractor identifier acquisition.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use magpie_core::{Extractor, IngestError, IngestResult, LoaderIndex};
use magpie_extractors::ExtractorFactory;

use crate::USER_AGENT;

const DEFAULT_INDEX_TIMEOUT: Duration = Duration::from_secs(30);

/// One index entry: the canonical identifier an alias maps onto.
#[derive(Debug, Deserialize)]
struct IndexEntry {
    id: String,
}

/// Loader index backed by a remote JSON document.
///
/// The index maps community identifiers onto canonical ones that are
/// constructible in this build; an alias that maps outside the compiled
/// set is an error, since extractors cannot be acquired as code at
/// runtime.
pub struct HttpLoaderIndex {
    client: reqwest::Client,
    index_url: String,
    timeout: Duration,
}

impl HttpLoaderIndex {
    /// Create an index client for the given index document URL.
    pub fn new(index_url: impl Into<String>) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                IngestError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            index_url: index_url.into(),
            timeout: DEFAULT_INDEX_TIMEOUT,
        })
    }

    /// Set the lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LoaderIndex for HttpLoaderIndex {
    async fn lookup(&self, identifier: &str) -> IngestResult<Arc<dyn Extractor>> {
        debug!(identifier, index_url = %self.index_url, "looking up identifier in loader index");

        let response = self
            .client
            .get(&self.index_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| IngestError::index(identifier, format!("index request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::index(
                identifier,
                format!("index returned HTTP {}", status.as_u16()),
            ));
        }

        let entries: HashMap<String, IndexEntry> = response.json().await.map_err(|e| {
            IngestError::index(identifier, format!("failed to parse index document: {}", e))
        })?;

        let entry = entries.get(identifier).ok_or_else(|| {
            IngestError::index(identifier, "identifier not present in index")
        })?;

        ExtractorFactory::for_identifier(&entry.id).map_err(|_| {
            IngestError::index(
                identifier,
                format!("index maps to '{}', which is not constructible in this build", entry.id),
            )
        })
    }
}
