//! Content service — a stateless façade over the object store backend.

use std::io::Cursor;
use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use contenthub_core::config::ObjectStoreConfig;
use contenthub_core::error::{AppError, ErrorKind};
use contenthub_core::result::AppResult;
use contenthub_core::traits::object_store::ObjectStore;
use contenthub_core::types::UploadedFile;
use contenthub_storage::S3ObjectStore;

/// Translates content operations into calls against the object store.
///
/// Stateless aside from the read-only configuration; concurrent calls
/// need no coordination.
#[derive(Clone)]
pub struct ContentService {
    /// Object store backend.
    store: Arc<dyn ObjectStore>,
    /// Object store configuration.
    config: ObjectStoreConfig,
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService").finish()
    }
}

impl ContentService {
    /// Creates a new content service over an existing store.
    pub fn new(store: Arc<dyn ObjectStore>, config: ObjectStoreConfig) -> Self {
        Self { store, config }
    }

    /// Creates a content service backed by an S3-compatible store built
    /// from the given configuration.
    pub async fn from_config(config: ObjectStoreConfig) -> AppResult<Self> {
        let store = S3ObjectStore::new(&config).await?;
        Ok(Self::new(Arc::new(store), config))
    }

    /// Returns a presigned, time-limited GET URL for `target_path`.
    ///
    /// When an endpoint override is configured, every literal occurrence
    /// of the internal endpoint in the URL is replaced with the override.
    /// This is plain substring substitution, not URL re-parsing, so an
    /// endpoint string appearing in a path or query segment is rewritten
    /// too.
    pub async fn preview(&self, target_path: &str, expires_secs: u32) -> AppResult<String> {
        if target_path.is_empty() {
            return Err(AppError::validation("target_path must not be empty"));
        }

        let mut url = self
            .store
            .presigned_get_url(&self.config.bucket, target_path, expires_secs)
            .await?;
        debug!(%url, "Presigned URL generated");

        if !self.config.endpoint_overwrite.is_empty() {
            url = url.replace(&self.config.endpoint, &self.config.endpoint_overwrite);
        }
        debug!(%url, "Presigned URL after endpoint rewrite");

        Ok(url)
    }

    /// Uploads a file payload to `target_path` in the configured bucket.
    ///
    /// The object is stored with the file's declared content type and
    /// length. Cancellation mid-transfer abandons the upload; partial
    /// object state is backend-defined and not cleaned up here.
    pub async fn upload(
        &self,
        file: UploadedFile,
        target_path: &str,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        if target_path.is_empty() {
            return Err(AppError::validation("target_path must not be empty"));
        }

        let size_bytes = file.size_bytes;
        let content_type = file.content_type.clone();
        self.store
            .put_object(
                &self.config.bucket,
                target_path,
                file.into_bytes(),
                size_bytes,
                &content_type,
                cancel,
            )
            .await
    }

    /// Downloads the object at `target_path`, fully buffered in memory.
    ///
    /// Returns a cursor positioned at the start of the object's contents.
    /// The whole object is buffered, so this is only suitable for objects
    /// of bounded size. If cancelled, no partial stream is returned.
    pub async fn download(
        &self,
        target_path: &str,
        cancel: &CancellationToken,
    ) -> AppResult<Cursor<Vec<u8>>> {
        if target_path.is_empty() {
            return Err(AppError::validation("target_path must not be empty"));
        }

        let mut stream = self
            .store
            .get_object(&self.config.bucket, target_path, cancel)
            .await?;

        let mut buffer = Vec::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(AppError::cancelled(format!(
                        "Download of '{target_path}' was cancelled"
                    )));
                }
                chunk = stream.next() => match chunk {
                    Some(chunk) => {
                        let chunk = chunk.map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Storage,
                                format!("Stream read error for '{target_path}'"),
                                e,
                            )
                        })?;
                        buffer.extend_from_slice(&chunk);
                    }
                    None => break,
                },
            }
        }

        Ok(Cursor::new(buffer))
    }

    /// Removes the object at `target_path` from the configured bucket.
    ///
    /// Backend failures are logged and swallowed: this method always
    /// reports success, and callers cannot distinguish a deleted object,
    /// a missing object, or a failed delete. Calling it twice for the
    /// same path never fails.
    pub async fn remove(&self, target_path: &str) -> AppResult<()> {
        if let Err(e) = self
            .store
            .delete_object(&self.config.bucket, target_path)
            .await
        {
            error!(path = target_path, error = %e, "Object delete failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use contenthub_core::traits::object_store::ByteStream;

    /// Arguments captured from a `put_object` call.
    #[derive(Debug, Clone, PartialEq)]
    struct RecordedPut {
        bucket: String,
        key: String,
        data: Vec<u8>,
        size_bytes: u64,
        content_type: String,
    }

    /// Scripted in-memory object store double that records every call.
    #[derive(Debug, Default)]
    struct RecordingStore {
        presign_url: String,
        get_body: Vec<u8>,
        fail_deletes: bool,
        presigns: Mutex<Vec<(String, String, u32)>>,
        puts: Mutex<Vec<RecordedPut>>,
        gets: Mutex<Vec<String>>,
        deletes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn presigned_get_url(
            &self,
            bucket: &str,
            key: &str,
            expires_secs: u32,
        ) -> AppResult<String> {
            self.presigns
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string(), expires_secs));
            Ok(self.presign_url.clone())
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
            if cancel.is_cancelled() {
                return Err(AppError::cancelled(format!(
                    "Upload of '{key}' was cancelled"
                )));
            }
            self.puts.lock().unwrap().push(RecordedPut {
                bucket: bucket.to_string(),
                key: key.to_string(),
                data: data.to_vec(),
                size_bytes,
                content_type: content_type.to_string(),
            });
            Ok(())
        }

        async fn get_object(
            &self,
            _bucket: &str,
            key: &str,
            _cancel: &CancellationToken,
        ) -> AppResult<ByteStream> {
            self.gets.lock().unwrap().push(key.to_string());
            let body = Bytes::from(self.get_body.clone());
            Ok(Box::pin(futures::stream::once(async move {
                Ok::<_, std::io::Error>(body)
            })))
        }

        async fn delete_object(&self, _bucket: &str, key: &str) -> AppResult<()> {
            self.deletes.lock().unwrap().push(key.to_string());
            if self.fail_deletes {
                return Err(AppError::storage(format!(
                    "Failed to delete object '{key}': access denied"
                )));
            }
            Ok(())
        }
    }

    fn test_config() -> ObjectStoreConfig {
        ObjectStoreConfig {
            endpoint: "http://internal:9000".to_string(),
            bucket: "content".to_string(),
            ..ObjectStoreConfig::default()
        }
    }

    fn service_with(
        store: RecordingStore,
        config: ObjectStoreConfig,
    ) -> (Arc<RecordingStore>, ContentService) {
        let store = Arc::new(store);
        let service = ContentService::new(store.clone(), config);
        (store, service)
    }

    #[tokio::test]
    async fn test_preview_returns_raw_url_without_override() {
        let (store, service) = service_with(
            RecordingStore {
                presign_url: "http://internal:9000/content/file.png?sig=abc".to_string(),
                ..RecordingStore::default()
            },
            test_config(),
        );

        let url = service.preview("file.png", 3600).await.unwrap();
        assert_eq!(url, "http://internal:9000/content/file.png?sig=abc");

        let presigns = store.presigns.lock().unwrap();
        assert_eq!(
            *presigns,
            vec![("content".to_string(), "file.png".to_string(), 3600)]
        );
    }

    #[tokio::test]
    async fn test_preview_rewrites_endpoint_when_override_set() {
        let config = ObjectStoreConfig {
            endpoint_overwrite: "https://cdn.example.com".to_string(),
            ..test_config()
        };
        let (_, service) = service_with(
            RecordingStore {
                presign_url: "http://internal:9000/content/file.png?sig=abc".to_string(),
                ..RecordingStore::default()
            },
            config,
        );

        let url = service.preview("file.png", 3600).await.unwrap();
        assert_eq!(url, "https://cdn.example.com/content/file.png?sig=abc");
    }

    #[tokio::test]
    async fn test_preview_rewrites_every_literal_occurrence() {
        let config = ObjectStoreConfig {
            endpoint_overwrite: "https://cdn.example.com".to_string(),
            ..test_config()
        };
        let (_, service) = service_with(
            RecordingStore {
                // Endpoint string also appears as a path segment.
                presign_url: "http://internal:9000/content/http://internal:9000/a.txt?sig=abc"
                    .to_string(),
                ..RecordingStore::default()
            },
            config,
        );

        let url = service.preview("a.txt", 60).await.unwrap();
        assert_eq!(
            url,
            "https://cdn.example.com/content/https://cdn.example.com/a.txt?sig=abc"
        );
    }

    #[tokio::test]
    async fn test_empty_path_fails_before_any_backend_call() {
        let (store, service) = service_with(RecordingStore::default(), test_config());
        let cancel = CancellationToken::new();

        let err = service.preview("", 3600).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let file = UploadedFile::new("a.txt", "text/plain", Bytes::from_static(b"hello"));
        let err = service.upload(file, "", &cancel).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service.download("", &cancel).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        assert!(store.presigns.lock().unwrap().is_empty());
        assert!(store.puts.lock().unwrap().is_empty());
        assert!(store.gets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_forwards_payload_length_and_content_type() {
        let (store, service) = service_with(RecordingStore::default(), test_config());
        let cancel = CancellationToken::new();

        let file = UploadedFile::new("a.txt", "text/plain", Bytes::from_static(b"hello"));
        service.upload(file, "docs/a.txt", &cancel).await.unwrap();

        let puts = store.puts.lock().unwrap();
        assert_eq!(
            *puts,
            vec![RecordedPut {
                bucket: "content".to_string(),
                key: "docs/a.txt".to_string(),
                data: b"hello".to_vec(),
                size_bytes: 5,
                content_type: "text/plain".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_download_buffers_full_object_rewound_to_start() {
        let (store, service) = service_with(
            RecordingStore {
                get_body: b"hello".to_vec(),
                ..RecordingStore::default()
            },
            test_config(),
        );
        let cancel = CancellationToken::new();

        let cursor = service.download("docs/a.txt", &cancel).await.unwrap();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.into_inner(), b"hello");

        assert_eq!(*store.gets.lock().unwrap(), vec!["docs/a.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_swallows_backend_errors_and_is_idempotent() {
        let (store, service) = service_with(
            RecordingStore {
                fail_deletes: true,
                ..RecordingStore::default()
            },
            test_config(),
        );

        service.remove("docs/a.txt").await.unwrap();
        service.remove("docs/a.txt").await.unwrap();

        assert_eq!(
            *store.deletes.lock().unwrap(),
            vec!["docs/a.txt".to_string(), "docs/a.txt".to_string()]
        );
    }

    #[tokio::test]
    async fn test_remove_forwards_path_without_validation() {
        let (store, service) = service_with(RecordingStore::default(), test_config());

        service.remove("").await.unwrap();

        assert_eq!(*store.deletes.lock().unwrap(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_cancelled_upload_fails_without_storing() {
        let (store, service) = service_with(RecordingStore::default(), test_config());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let file = UploadedFile::new("a.txt", "text/plain", Bytes::from_static(b"hello"));
        let err = service.upload(file, "docs/a.txt", &cancel).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_download_returns_no_partial_stream() {
        let (_, service) = service_with(
            RecordingStore {
                get_body: b"hello".to_vec(),
                ..RecordingStore::default()
            },
            test_config(),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service.download("docs/a.txt", &cancel).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }
}
