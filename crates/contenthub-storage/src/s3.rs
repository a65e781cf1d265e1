//! S3-compatible object store backed by `aws-sdk-s3`.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use contenthub_core::config::ObjectStoreConfig;
use contenthub_core::error::{AppError, ErrorKind};
use contenthub_core::result::AppResult;
use contenthub_core::traits::object_store::{ByteStream, ObjectStore};

/// Object store for S3-compatible backends (AWS S3, MinIO).
///
/// Holds one shared SDK client built at construction time; every
/// operation is a single request/response exchange with the backend,
/// with no retry loop of its own.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    /// Shared SDK client.
    client: Client,
}

impl S3ObjectStore {
    /// Create a new store, building the shared client from configuration.
    pub async fn new(config: &ObjectStoreConfig) -> AppResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AppError::configuration(
                "Object store endpoint is not configured",
            ));
        }
        tracing::info!(
            endpoint = %config.endpoint,
            region = %config.region,
            "Initializing S3 object store"
        );
        let client = crate::client::build_client(config).await;
        Ok(Self { client })
    }

    /// Wrap an already-built SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_secs: u32,
    ) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(u64::from(expires_secs)))
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Presign expiry rejected for '{key}': {e}"),
                    e,
                )
            })?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to presign GET for '{key}': {e}"),
                    e,
                )
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        size_bytes: u64,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        let send = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from(data))
            .content_length(size_bytes as i64)
            .content_type(content_type)
            .send();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(AppError::cancelled(format!("Upload of '{key}' was cancelled")))
            }
            result = send => {
                result.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to put object '{key}': {e}"),
                        e,
                    )
                })?;
                debug!(key, bytes = size_bytes, "Stored object");
                Ok(())
            }
        }
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> AppResult<ByteStream> {
        let send = self.client.get_object().bucket(bucket).key(key).send();

        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::cancelled(format!(
                    "Download of '{key}' was cancelled"
                )));
            }
            result = send => {
                result.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to get object '{key}': {e}"),
                        e,
                    )
                })?
            }
        };

        Ok(body_stream(output.body))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete object '{key}': {e}"),
                    e,
                )
            })?;
        debug!(key, "Deleted object");
        Ok(())
    }
}

/// Adapt an SDK response body into the core byte stream type.
fn body_stream(body: aws_sdk_s3::primitives::ByteStream) -> ByteStream {
    Box::pin(futures::stream::try_unfold(body, |mut body| async move {
        match body.try_next().await {
            Ok(Some(chunk)) => Ok(Some((chunk, body))),
            Ok(None) => Ok(None),
            Err(e) => Err(std::io::Error::other(e)),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_body_stream_yields_full_contents() {
        let body = aws_sdk_s3::primitives::ByteStream::from_static(b"hello");
        let mut stream = body_stream(body);

        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"hello");
    }

    #[tokio::test]
    async fn test_new_requires_endpoint() {
        let config = ObjectStoreConfig::default();
        let err = S3ObjectStore::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
