//! Generation-versioned object storage.
//!
//! Every successful write returns the generation storage assigned to the
//! object; conditional writes only apply while the object is still at the
//! generation the caller observed. [`GENERATION_ABSENT`] as the expected
//! generation means "only create, never overwrite".

use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;

/// Expected generation meaning the object must not exist yet.
pub const GENERATION_ABSENT: i64 = 0;

/// An object's payload plus the generation stamp it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub generation: i64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage returned {code} for {key}: {body}")]
    Status { code: u16, key: String, body: String },
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("generation precondition failed for {0}")]
    PreconditionFailed(String),
    #[error("storage response could not be decoded: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True for failures a retry can clear: transport errors and
    /// server-side 5xx responses. Client rejections are final.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Http(_) => true,
            StoreError::Status { code, .. } => *code >= 500,
            _ => false,
        }
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Writes `data` unconditionally and returns the new generation.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<i64, StoreError>;

    /// Writes `data` only if the object is still at generation `expected`
    /// ([`GENERATION_ABSENT`] for "does not exist yet"). Fails with
    /// [`StoreError::PreconditionFailed`] otherwise.
    async fn put_if_generation(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        expected: i64,
    ) -> Result<i64, StoreError>;

    /// Uploads a local file unconditionally and returns the new generation.
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<i64, StoreError>;

    /// Reads the object and the generation it was read at.
    async fn get(&self, key: &str) -> Result<StoredObject, StoreError>;

    /// The URI under which other systems can address this key, e.g.
    /// `gs://bucket/audio/ep.wav`.
    fn uri_for(&self, key: &str) -> String;
}

/// In-process store backed by a concurrent map. Generations start at 1 and
/// bump on every write, mirroring how the remote store stamps objects.
pub struct MemoryObjectStore {
    bucket: String,
    objects: DashMap<String, StoredObject>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: DashMap::new(),
        }
    }

    /// Number of stored objects. Handy for asserting nothing leaked in.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Keys currently present, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.objects.iter().map(|e| e.key().clone()).collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<i64, StoreError> {
        match self.objects.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let generation = entry.get().generation + 1;
                entry.insert(StoredObject { data, generation });
                Ok(generation)
            }
            Entry::Vacant(entry) => {
                entry.insert(StoredObject {
                    data,
                    generation: 1,
                });
                Ok(1)
            }
        }
    }

    async fn put_if_generation(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
        expected: i64,
    ) -> Result<i64, StoreError> {
        // The entry guard holds the shard lock, so check-and-write is atomic.
        match self.objects.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().generation != expected {
                    return Err(StoreError::PreconditionFailed(key.to_string()));
                }
                let generation = expected + 1;
                entry.insert(StoredObject { data, generation });
                Ok(generation)
            }
            Entry::Vacant(entry) => {
                if expected != GENERATION_ABSENT {
                    return Err(StoreError::PreconditionFailed(key.to_string()));
                }
                entry.insert(StoredObject {
                    data,
                    generation: 1,
                });
                Ok(1)
            }
        }
    }

    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<i64, StoreError> {
        let data = tokio::fs::read(path).await?;
        self.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StoreError> {
        self.objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn uri_for(&self, key: &str) -> String {
        format!("mem://{}/{}", self.bucket, key)
    }
}
