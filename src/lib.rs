//! # vecdb - A Minimal Vector-Embedding Store
//!
//! vecdb keeps named collections of document -> embedding tables on disk and
//! answers nearest-neighbour lookups by brute-force cosine similarity.
//! Embeddings come from an external [`EmbeddingProvider`].
//!
//! ## Example
//!
//! ```
//! use vecdb::{top_n, CollectionStore, LeasePolicy};
//! use indexmap::IndexMap;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut store = CollectionStore::load(dir.path(), LeasePolicy::Fail, true).unwrap();
//!
//! let mut data = IndexMap::new();
//! data.insert("a".to_string(), vec![1.0, 0.0]);
//! data.insert("b".to_string(), vec![0.0, 1.0]);
//! store.create(Some("t1".to_string()), Some(data)).unwrap();
//!
//! let table = store.get("t1").unwrap().table();
//! let results = top_n(&[1.0, 0.0], table, 1).unwrap();
//! assert_eq!(results, vec![("a".to_string(), 1.0)]);
//!
//! store.close().unwrap();
//! ```

pub mod config;
pub mod embeddings;
pub mod error;
pub mod lease;
pub mod search;
pub mod service;
pub mod store;
pub mod table;
pub mod vector;

pub use config::{Config, EmbeddingConfig};
pub use embeddings::{EmbeddingProvider, OpenAiEmbeddings};
pub use error::{Result, VecDbError};
pub use lease::LeasePolicy;
pub use search::top_n;
pub use service::{AddRequest, CreateRequest, CreateResponse, ErrorResponse, LookupRequest, Neighbor, VecDb};
pub use store::{Collection, CollectionStore};
pub use table::VectorTable;
pub use vector::cosine_similarity;
