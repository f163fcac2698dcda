//! Embedding providers.
//!
//! The store never computes embeddings itself. It asks an [`EmbeddingProvider`]
//! and treats it as a slow call that may fail. [`OpenAiEmbeddings`] talks to an
//! OpenAI-compatible `/embeddings` endpoint.

use crate::config::EmbeddingConfig;
use crate::error::{Result, VecDbError};
use indexmap::{IndexMap, IndexSet};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turns texts into vectors.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds every text. The returned map has one entry per distinct input,
    /// in first-occurrence order.
    fn embed(&self, texts: &[String]) -> Result<IndexMap<String, Vec<f32>>>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

enum AttemptError {
    Retryable(String),
    Fatal(String),
}

/// Blocking client for the OpenAI embeddings API.
///
/// Requests time out after `timeout_secs`. Transport errors, 429 and 5xx are
/// retried with exponential backoff; any other failure is returned at once.
pub struct OpenAiEmbeddings {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    organization: Option<String>,
    max_retries: u32,
    backoff: Duration,
}

impl OpenAiEmbeddings {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| VecDbError::Embedding(format!("cannot build HTTP client: {}", e)))?;

        Ok(OpenAiEmbeddings {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.resolved_api_key(),
            organization: config.resolved_organization(),
            max_retries: config.max_retries,
            backoff: Duration::from_millis(500),
        })
    }

    /// Base delay before the first retry; doubles on each further attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn send(&self, input: &[String]) -> std::result::Result<EmbeddingResponse, AttemptError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&EmbeddingRequest { input, model: &self.model });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().map_err(|e| AttemptError::Retryable(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return response
                .json::<EmbeddingResponse>()
                .map_err(|e| AttemptError::Fatal(format!("malformed response: {}", e)));
        }

        let message = format!("{}: {}", status, response.text().unwrap_or_default());
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(AttemptError::Retryable(message))
        } else {
            Err(AttemptError::Fatal(message))
        }
    }
}

impl EmbeddingProvider for OpenAiEmbeddings {
    fn embed(&self, texts: &[String]) -> Result<IndexMap<String, Vec<f32>>> {
        let unique: Vec<String> = texts.iter().cloned().collect::<IndexSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return Ok(IndexMap::new());
        }

        let mut attempt = 0;
        loop {
            match self.send(&unique) {
                Ok(response) => return assemble(&unique, response),
                Err(AttemptError::Retryable(message)) if attempt < self.max_retries => {
                    let delay = self.backoff.saturating_mul(1u32 << attempt.min(16));
                    tracing::warn!(attempt = attempt + 1, delay = ?delay, error = %message, "embedding request failed, retrying");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(AttemptError::Retryable(message)) | Err(AttemptError::Fatal(message)) => {
                    return Err(VecDbError::Embedding(message));
                }
            }
        }
    }
}

/// Pairs response rows with their inputs by the rows' `index` field.
fn assemble(texts: &[String], response: EmbeddingResponse) -> Result<IndexMap<String, Vec<f32>>> {
    if response.data.len() != texts.len() {
        return Err(VecDbError::Embedding(format!(
            "expected {} embeddings, got {}",
            texts.len(),
            response.data.len()
        )));
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
    for row in response.data {
        let slot = slots
            .get_mut(row.index)
            .ok_or_else(|| VecDbError::Embedding(format!("embedding index {} out of range", row.index)))?;
        *slot = Some(row.embedding);
    }

    texts
        .iter()
        .zip(slots)
        .map(|(text, slot)| {
            slot.map(|vector| (text.clone(), vector))
                .ok_or_else(|| VecDbError::Embedding(format!("no embedding returned for '{}'", text)))
        })
        .collect()
}
