//! Object storage for published players maps and roster snapshots.
//!
//! The sync code talks to the [`ObjectStore`] trait; `s3` provides the
//! bucket-backed implementation used by the functions and `memory` an
//! in-process one for tests and dry runs.
//! - `keys`: object key layout for both collections

pub mod keys;
pub mod memory;
pub mod s3;


use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::Result;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Minimal bucket interface the sync needs.
pub trait ObjectStore: Send + Sync {
    /// Bucket name used to build `s3://` URIs.
    fn bucket(&self) -> &str;

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<()>;

    /// `Ok(None)` when the key does not exist.
    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket(), key)
    }
}

/// Write `value` as compact JSON and return its `s3://` URI.
pub fn put_json<T: Serialize + ?Sized>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
) -> Result<String> {
    let body = serde_json::to_vec(value)?;
    store.put_object(key, &body, JSON_CONTENT_TYPE)?;
    let uri = store.uri(key);
    info!(%uri, bytes = body.len(), "published object");
    Ok(uri)
}

/// Read a JSON object, treating missing keys and unreadable bodies as absent.
pub fn get_json<T: DeserializeOwned>(store: &dyn ObjectStore, key: &str) -> Option<T> {
    let body = match store.get_object(key) {
        Ok(Some(body)) => body,
        Ok(None) => {
            warn!(bucket = store.bucket(), key, "object not found");
            return None;
        }
        Err(e) => {
            warn!(bucket = store.bucket(), key, error = %e, "get_json failed");
            return None;
        }
    };

    match serde_json::from_slice(&body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(bucket = store.bucket(), key, error = %e, "stored object is not valid JSON");
            None
        }
    }
}
