//! Facade over the collection store and the embedding provider.
//!
//! [`VecDb`] exposes the operations a request layer needs. Request and
//! response types are plain serde structs, so a transport can decode JSON
//! bodies straight into them and encode results back out.
//!
//! ## Operations
//!
//! - `create_collection` - Create a collection, optionally with an id and data
//! - `collection_contents` - Every key and vector in a collection
//! - `add` - Embed and store documents, reporting which were already present
//! - `lookup` - Top-N most similar stored documents for each query word
//! - `vector` - A single stored vector
//! - `collection_ids` - List collections
//! - `delete_collection` - Remove a collection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vecdb::{Config, OpenAiEmbeddings, VecDb};
//!
//! # fn main() -> vecdb::Result<()> {
//! let config = Config::from_file("vecdb.json".as_ref())?;
//! let embedder = Arc::new(OpenAiEmbeddings::new(&config.embedding)?);
//! let db = VecDb::open(&config, embedder)?;
//! // ... serve requests ...
//! db.close()
//! # }
//! ```
//!
//! All state sits behind one `RwLock`. Embedding calls run without the lock held.

use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VecDbError};
use crate::search::top_n;
use crate::store::CollectionStore;
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

// --- Request structs ---

#[derive(Debug, Default, Deserialize)]
pub struct CreateRequest {
    /// Explicit id; a string or a non-negative integer. Generated when absent.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub data: Option<IndexMap<String, Vec<f32>>>,
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub text: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    /// Matches per word. Zero or negative returns no matches.
    #[serde(default = "default_topn")]
    pub topn: i64,
    pub words: Vec<String>,
}

fn default_topn() -> i64 {
    1
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(n) => n.to_string(),
    }))
}

// --- Response structs ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub word: String,
    pub closeness: f32,
}

/// Structured error body for a transport to send back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl From<&VecDbError> for ErrorResponse {
    fn from(error: &VecDbError) -> Self {
        ErrorResponse { code: error.code(), message: error.to_string() }
    }
}

/// The embedding store service.
pub struct VecDb {
    store: RwLock<CollectionStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VecDb {
    pub fn new(store: CollectionStore, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        VecDb { store: RwLock::new(store), embedder }
    }

    /// Loads the store at `config.data_dir`.
    pub fn open(config: &Config, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Ok(Self::new(CollectionStore::open(config)?, embedder))
    }

    pub fn create_collection(&self, request: CreateRequest) -> Result<CreateResponse> {
        let id = self.store.write().create(request.id, request.data)?;
        Ok(CreateResponse { id })
    }

    /// Every key and vector of a collection, in insertion order.
    pub fn collection_contents(&self, id: &str) -> Result<IndexMap<String, Vec<f32>>> {
        let store = self.store.read();
        let collection = store.get(id).ok_or_else(|| VecDbError::collection_not_found(id))?;
        Ok(collection.table().entries().clone())
    }

    pub fn vector(&self, id: &str, key: &str) -> Result<Vec<f32>> {
        let store = self.store.read();
        let collection = store.get(id).ok_or_else(|| VecDbError::collection_not_found(id))?;
        collection
            .table()
            .get(key)
            .map(<[f32]>::to_vec)
            .ok_or_else(|| VecDbError::NotFound(format!("key '{}' in collection '{}'", key, id)))
    }

    /// Embeds and stores each document that is not in the collection yet.
    ///
    /// Returns, per document, whether it was already present. A document
    /// repeated within one request ends up reported as present.
    pub fn add(&self, id: &str, request: AddRequest) -> Result<IndexMap<String, bool>> {
        let missing: Vec<String> = {
            let store = self.store.read();
            let collection = store.get(id).ok_or_else(|| VecDbError::collection_not_found(id))?;
            request
                .text
                .iter()
                .filter(|doc| !collection.table().contains(doc))
                .cloned()
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect()
        };

        let embedded = if missing.is_empty() {
            IndexMap::new()
        } else {
            self.embedder.embed(&missing)?
        };

        self.store.write().update(id, |collection| {
            let mut out = IndexMap::with_capacity(request.text.len());
            let mut pending: IndexMap<&str, &Vec<f32>> = IndexMap::new();
            for doc in &request.text {
                // Re-checked under the write lock; another add may have won.
                if collection.table().contains(doc) || pending.contains_key(doc.as_str()) {
                    out.insert(doc.clone(), true);
                    continue;
                }
                let vector = embedded
                    .get(doc)
                    .ok_or_else(|| VecDbError::Embedding(format!("no embedding returned for '{}'", doc)))?;
                pending.insert(doc.as_str(), vector);
                out.insert(doc.clone(), false);
            }

            // Nothing is written unless every new vector fits the table.
            let mut expected = collection.table().dimension();
            for vector in pending.values() {
                match expected {
                    Some(dim) if dim != vector.len() => {
                        return Err(VecDbError::DimensionMismatch { expected: dim, found: vector.len() });
                    }
                    Some(_) => {}
                    None => expected = Some(vector.len()),
                }
            }

            for (doc, vector) in pending {
                collection.table_mut().set(doc.to_string(), vector.clone())?;
            }
            Ok(out)
        })
    }

    /// For each word, the `topn` stored documents closest to its embedding.
    pub fn lookup(&self, id: &str, request: LookupRequest) -> Result<IndexMap<String, Vec<Neighbor>>> {
        if !self.store.read().contains(id) {
            return Err(VecDbError::collection_not_found(id));
        }

        let embedded = self.embedder.embed(&request.words)?;
        let n = usize::try_from(request.topn).unwrap_or(0);

        let store = self.store.read();
        let collection = store.get(id).ok_or_else(|| VecDbError::collection_not_found(id))?;

        let mut results: IndexMap<String, Vec<Neighbor>> = IndexMap::with_capacity(embedded.len());
        for (word, vector) in embedded {
            let matches: Vec<Neighbor> = top_n(&vector, collection.table(), n)?
                .into_iter()
                .map(|(word, closeness)| Neighbor { word, closeness })
                .collect();
            results.insert(word, matches);
        }
        Ok(results)
    }

    pub fn collection_ids(&self) -> Vec<String> {
        self.store.read().names()
    }

    pub fn delete_collection(&self, id: &str) -> Result<()> {
        self.store.write().delete(id)
    }

    pub fn flush(&self) -> Result<()> {
        self.store.read().flush()
    }

    /// Flushes every collection and releases the leases.
    pub fn close(self) -> Result<()> {
        self.store.into_inner().close()
    }
}

#[cfg(test)]
mod service_test {
    use super::*;

    #[test]
    fn test_create_request_accepts_numeric_id() {
        let request: CreateRequest = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(request.id.as_deref(), Some("42"));
        assert!(request.data.is_none());
    }

    #[test]
    fn test_create_request_all_optional() {
        let request: CreateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.id.is_none());

        let request: CreateRequest =
            serde_json::from_str(r#"{"id": "t1", "data": {"a": [1, 0], "b": [0, 1]}}"#).unwrap();
        let data = request.data.unwrap();
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(data["a"], vec![1.0, 0.0]);
    }

    #[test]
    fn test_lookup_request_default_topn() {
        let request: LookupRequest = serde_json::from_str(r#"{"words": ["cat"]}"#).unwrap();
        assert_eq!(request.topn, 1);

        let missing_words = serde_json::from_str::<LookupRequest>(r#"{"topn": 3}"#);
        assert!(missing_words.is_err());
    }

    #[test]
    fn test_error_response_from_error() {
        let body = ErrorResponse::from(&VecDbError::DuplicateId("t1".to_string()));
        assert_eq!(body.code, "duplicate_id");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"code": "duplicate_id", "message": "collection id 't1' already exists"})
        );
    }
}
