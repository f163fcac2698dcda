//! Service configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! ```
//! use vecdb::{Config, LeasePolicy};
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "data_dir": "/var/lib/vecdb",
//!     "lease_policy": "reclaim",
//!     "embedding": { "max_retries": 5 }
//! }"#).unwrap();
//!
//! assert_eq!(config.lease_policy, LeasePolicy::Reclaim);
//! assert!(config.persist_on_write);
//! assert_eq!(config.embedding.max_retries, 5);
//! assert_eq!(config.embedding.model, "text-embedding-ada-002");
//! ```

use crate::error::{Result, VecDbError};
use crate::lease::LeasePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one `<id>.vec` file per collection.
    pub data_dir: PathBuf,
    /// Write a collection back to disk after every mutation, not only at close.
    pub persist_on_write: bool,
    pub lease_policy: LeasePolicy,
    pub embedding: EmbeddingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./vecdb"),
            persist_on_write: true,
            lease_policy: LeasePolicy::Fail,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl Config {
    /// Storage-only config rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Self::default() }
    }

    /// Reads a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| VecDbError::corrupt(path, e))
    }
}

/// Settings for the OpenAI-compatible embeddings client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub model: String,
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Falls back to `OPENAI_ORG_ID` when unset.
    pub organization: Option<String>,
    pub timeout_secs: u64,
    /// Extra attempts after the first one on transport errors, 429 and 5xx.
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            organization: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }

    pub fn resolved_organization(&self) -> Option<String> {
        self.organization.clone().or_else(|| std::env::var("OPENAI_ORG_ID").ok())
    }
}
