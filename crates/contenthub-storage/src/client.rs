//! One-time construction of the shared S3 SDK client.

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Builder, Credentials, Region};

use contenthub_core::config::ObjectStoreConfig;

/// Build an S3 client from the object store configuration.
///
/// Called once at startup; the client is thread-safe and shared across
/// all operations. Path-style addressing is forced for compatibility
/// with MinIO-style endpoints.
pub async fn build_client(config: &ObjectStoreConfig) -> Client {
    let credentials = Credentials::new(
        config.access_key.clone(),
        config.secret_key.clone(),
        None,
        None,
        "contenthub",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await;

    let s3_config = Builder::from(&sdk_config)
        .endpoint_url(config.endpoint.clone())
        .force_path_style(true)
        .build();

    Client::from_conf(s3_config)
}
