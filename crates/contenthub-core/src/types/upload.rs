//! Inbound file upload abstraction.

use bytes::Bytes;

/// A file received from the HTTP layer, ready to be stored.
///
/// Carries the original filename, the declared content type, the byte
/// length, and the payload itself. Moving the value into an upload call
/// releases the payload on every exit path.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as submitted by the client.
    pub file_name: String,
    /// Declared content type.
    pub content_type: String,
    /// Payload length in bytes.
    pub size_bytes: u64,
    /// Payload bytes.
    data: Bytes,
}

impl UploadedFile {
    /// Create a new uploaded file; the length is taken from the payload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes: data.len() as u64,
            data,
        }
    }

    /// Borrow the payload bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consume the file, yielding the payload bytes.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}
