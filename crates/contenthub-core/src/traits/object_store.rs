//! Object store trait for the S3-compatible content backend.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::result::AppResult;

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for S3-compatible object store backends.
///
/// The [`ObjectStore`] trait is defined here in `contenthub-core` and
/// implemented in `contenthub-storage`. The bucket is an explicit
/// argument on every method. Only `put_object` and `get_object` accept
/// a cancellation token: delete does not expose one, and the presign
/// request itself is not cancellable.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Generate a presigned, time-limited GET URL for `bucket/key`.
    ///
    /// The expiry is forwarded unvalidated; backend-defined bounds apply.
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_secs: u32,
    ) -> AppResult<String>;

    /// Write an object to `bucket/key`, tagged with the given content type
    /// and declared length.
    ///
    /// Cancellation abandons the transfer; partial object state is
    /// backend-defined.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        size_bytes: u64,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> AppResult<()>;

    /// Fetch the object at `bucket/key` as a stream of byte chunks.
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> AppResult<ByteStream>;

    /// Delete the object at `bucket/key`.
    ///
    /// Errors are returned to the caller unchanged; any swallowing is the
    /// caller's policy.
    async fn delete_object(&self, bucket: &str, key: &str) -> AppResult<()>;
}
