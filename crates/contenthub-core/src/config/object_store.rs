//! Object store backend configuration.

use serde::{Deserialize, Serialize};

/// S3-compatible object store configuration.
///
/// `endpoint_overwrite` is a publicly reachable URL substituted for the
/// internal endpoint when generating externally-facing presigned links
/// (e.g. behind a reverse proxy or CDN). An empty string disables the
/// rewriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    /// Endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Public endpoint substituted into presigned URLs.
    #[serde(default)]
    pub endpoint_overwrite: String,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            endpoint_overwrite: String::new(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}
