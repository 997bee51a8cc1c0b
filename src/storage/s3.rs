use aws_sdk_s3::{config::Region, primitives::ByteStream};

use crate::{error::SyncError, storage::ObjectStore, Result};

/// Bucket-backed store.
///
/// The trait is synchronous, so calls are bridged onto the current tokio
/// runtime with `block_in_place`; this requires the multi-threaded runtime.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    bucket: String,
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(bucket: impl Into<String>, client: aws_sdk_s3::Client) -> Self {
        Self {
            bucket: bucket.into(),
            client,
        }
    }

    /// Build a client from the default credential chain in `region`.
    pub async fn connect(bucket: impl Into<String>, region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(bucket, aws_sdk_s3::Client::new(&config))
    }
}

impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<()> {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let body_bytes = body.to_vec();
        let content_type = content_type.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .content_type(content_type)
                    .body(ByteStream::from(body_bytes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        SyncError::storage(format!("failed to write object to s3: {error}"))
                    })
            })
        })
    }

    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let object_key = key.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = match client.get_object().bucket(bucket).key(object_key).send().await
                {
                    Ok(output) => output,
                    Err(error) => {
                        if error
                            .as_service_error()
                            .is_some_and(|e| e.is_no_such_key())
                        {
                            return Ok(None);
                        }
                        return Err(SyncError::storage(format!(
                            "failed to read object from s3: {error}"
                        )));
                    }
                };

                let data = output.body.collect().await.map_err(|error| {
                    SyncError::storage(format!("failed to read s3 object body: {error}"))
                })?;
                Ok(Some(data.into_bytes().to_vec()))
            })
        })
    }
}
