use std::{collections::BTreeMap, sync::Mutex};

use crate::{error::SyncError, storage::ObjectStore, Result};

/// A stored object body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-process bucket, keyed by object key.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    /// All keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.lock().map(|o| o.keys().cloned().collect()).unwrap_or_default()
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.lock().ok().and_then(|o| o.get(key).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>>> {
        self.objects
            .lock()
            .map_err(|_| SyncError::storage("memory store lock poisoned"))
    }
}

impl ObjectStore for MemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<()> {
        self.lock()?.insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).map(|o| o.body.clone()))
    }
}
